//! # orchestrator
//!
//! The per-request reasoning loop:
//! `Start → Reasoning → (ToolCall → Observation → Reasoning)* → FinalAnswer → Persist → Done`.
//!
//! The orchestrator composes window history with the new message, drives the
//! reasoning step against the tool registry, enforces the domain policy via
//! the system prompt, and persists the resulting user/assistant pair only
//! after a final answer was reached. Tool-selection ambiguity is resolved
//! entirely by the reasoning step; the loop only validates that a requested
//! tool exists and dispatches it.
//!
//! ## Concurrency
//!
//! Requests for one session are serialized end-to-end by a per-session gate,
//! so turn pairs never interleave; distinct sessions run concurrently. Both
//! the reasoning call and every tool call carry a per-call timeout. A dropped
//! request future leaves session memory untouched because nothing is appended
//! before the final answer.

mod gate;
mod policy;

pub use policy::DomainPolicy;

use assistant_core::{ChatError, Turn};
use gate::SessionGate;
use oracle_client::{OracleAction, OracleMessage, ReasoningOracle};
use session_memory::WindowMemory;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tool_registry::ToolRegistry;
use tracing::{info, instrument, warn};

/// Loop bounds and per-call budgets.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Reasoning iterations allowed before the request fails.
    pub max_iterations: usize,
    /// Budget for one reasoning call.
    pub oracle_timeout: Duration,
    /// Budget for one tool invocation.
    pub tool_timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            oracle_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
        }
    }
}

/// Session-scoped reasoning engine. Cheap to share behind an `Arc`.
pub struct Orchestrator {
    memory: Arc<WindowMemory>,
    registry: Arc<ToolRegistry>,
    oracle: Arc<dyn ReasoningOracle>,
    policy: DomainPolicy,
    config: OrchestratorConfig,
    gate: SessionGate,
}

impl Orchestrator {
    pub fn new(
        memory: Arc<WindowMemory>,
        registry: Arc<ToolRegistry>,
        oracle: Arc<dyn ReasoningOracle>,
        policy: DomainPolicy,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            memory,
            registry,
            oracle,
            policy,
            config,
            gate: SessionGate::new(),
        }
    }

    /// Handles one chat message for the session and returns the final answer.
    ///
    /// Empty messages are rejected before any state is touched. On success
    /// the user/assistant pair has been appended to session memory; on any
    /// error nothing was persisted.
    #[instrument(skip(self, message), fields(session_id = %session_id))]
    pub async fn handle(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        // At most one in-flight loop per session.
        let _guard = self.gate.lock(session_id).await;

        let answer = self.run_loop(session_id, message).await?;

        self.memory
            .append_pair(session_id, Turn::user(message), Turn::assistant(answer.as_str()));
        info!(session_id = %session_id, "final answer persisted");
        Ok(answer)
    }

    /// Removes the session's window history. Serialized against in-flight
    /// requests for the same session.
    pub async fn clear_session(&self, session_id: &str) {
        {
            let _guard = self.gate.lock(session_id).await;
            self.memory.clear(session_id);
        }
        // The guard is dropped; release the gate entry too unless another
        // request is already waiting on it.
        self.gate.evict(session_id);
        info!(session_id = %session_id, "session cleared");
    }

    async fn run_loop(&self, session_id: &str, message: &str) -> Result<String, ChatError> {
        let mut transcript = self.build_transcript(session_id, message);
        let descriptors = self.registry.descriptors();

        for iteration in 0..self.config.max_iterations {
            let action = timeout(
                self.config.oracle_timeout,
                self.oracle.reason(&transcript, &descriptors),
            )
            .await
            .map_err(|_| {
                warn!(session_id = %session_id, iteration, "reasoning call timed out");
                ChatError::Timeout
            })?
            .map_err(|e| ChatError::Oracle(e.to_string()))?;

            match action {
                OracleAction::Final { answer } => {
                    info!(session_id = %session_id, iteration, "reasoning reached final answer");
                    return Ok(answer);
                }
                OracleAction::ToolCall {
                    id,
                    name,
                    input,
                    arguments,
                } => {
                    let tool = self
                        .registry
                        .get(&name)
                        .ok_or_else(|| ChatError::UnknownTool(name.clone()))?;

                    info!(session_id = %session_id, iteration, tool = %name, "dispatching tool");
                    let observation = timeout(self.config.tool_timeout, tool.invoke(&input))
                        .await
                        .map_err(|_| {
                            warn!(session_id = %session_id, tool = %name, "tool call timed out");
                            ChatError::Timeout
                        })?;

                    transcript.push(OracleMessage::AssistantToolCall {
                        id: id.clone(),
                        name,
                        arguments,
                    });
                    transcript.push(OracleMessage::ToolResult {
                        call_id: id,
                        content: observation,
                    });
                }
            }
        }

        Err(ChatError::IterationLimit(self.config.max_iterations))
    }

    /// System prompt, then the retained window, then the new user message.
    fn build_transcript(&self, session_id: &str, message: &str) -> Vec<OracleMessage> {
        let history = self.memory.load(session_id);
        let mut transcript = Vec::with_capacity(history.len() + 2);
        transcript.push(OracleMessage::system(self.policy.system_prompt()));
        for turn in history {
            transcript.push(match turn.role {
                assistant_core::Role::User => OracleMessage::User(turn.content),
                assistant_core::Role::Assistant => OracleMessage::Assistant(turn.content),
            });
        }
        transcript.push(OracleMessage::user(message));
        transcript
    }
}
