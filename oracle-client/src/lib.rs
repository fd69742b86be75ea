//! # oracle-client
//!
//! The reasoning-step abstraction: given a transcript and the available tool
//! descriptors, return either a tool invocation request or a final answer.
//! The decision mechanism itself is opaque; this crate defines the
//! [`ReasoningOracle`] trait plus an OpenAI-backed implementation, so the
//! orchestration loop owns iteration bounds, timeouts, and cancellation
//! instead of a hidden framework loop.

mod config;
mod openai_oracle;

pub use config::OracleConfig;
pub use openai_oracle::OpenAiOracle;

use async_trait::async_trait;
use tool_registry::ToolDescriptor;

/// One item of the transcript presented to the reasoning step.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleMessage {
    /// Instructions: domain rules, schema, refusal policy.
    System(String),
    User(String),
    Assistant(String),
    /// The reasoning step's own earlier tool request, replayed so it can see
    /// what it asked for.
    AssistantToolCall {
        id: String,
        name: String,
        arguments: String,
    },
    /// Observation produced by running the requested tool.
    ToolResult { call_id: String, content: String },
}

impl OracleMessage {
    pub fn system(content: impl Into<String>) -> Self {
        OracleMessage::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        OracleMessage::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        OracleMessage::Assistant(content.into())
    }
}

/// What the reasoning step decided for the current iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleAction {
    /// Invoke the named tool with the extracted input, then reason again.
    ToolCall {
        /// Provider-side call id, echoed back with the observation.
        id: String,
        /// Registry name of the requested tool.
        name: String,
        /// The input string for the tool.
        input: String,
        /// Raw arguments payload, kept for transcript replay.
        arguments: String,
    },
    /// The conversation is answered; stop the loop.
    Final { answer: String },
}

/// External decision-making capability: selects the next tool or produces the
/// final answer. Implementations must be safe to call concurrently from
/// independent sessions.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    async fn reason(
        &self,
        transcript: &[OracleMessage],
        tools: &[ToolDescriptor],
    ) -> anyhow::Result<OracleAction>;
}

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars,
/// or just "***" when the key is too short to mask meaningfully.
pub fn mask_token(token: &str) -> String {
    // Operate on chars so keys containing multibyte characters never slice
    // inside a code point.
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        "***".to_string()
    } else {
        let head: String = chars[..7].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}***{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: long keys keep head and tail, short keys are fully masked.**
    #[test]
    fn mask_token_hides_key_material() {
        assert_eq!(mask_token("sk-abcd1234efgh5678"), "sk-abcd***5678");
        assert_eq!(mask_token("short"), "***");
        assert_eq!(mask_token(""), "***");
    }

    /// **Test: keys with multibyte characters are masked without panicking.**
    #[test]
    fn mask_token_handles_multibyte_keys() {
        assert_eq!(mask_token("sk-ünïcödé1234wxyz"), "sk-ünïc***wxyz");
        // 11 chars but more than 11 bytes; fully masked.
        assert_eq!(mask_token("ααααααααααα"), "***");
    }
}
