//! OpenAI-backed [`ReasoningOracle`]: one chat completion per reasoning step,
//! with tool descriptors advertised as function tools.

use crate::{mask_token, OracleAction, OracleConfig, OracleMessage, ReasoningOracle};
use anyhow::Result;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
    CreateChatCompletionRequestArgs, FunctionCall, FunctionObjectArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use serde_json::json;
use tool_registry::ToolDescriptor;
use tracing::{info, instrument};

/// Reasoning step backed by an OpenAI-compatible chat completion endpoint.
/// Temperature is pinned to 0 so tool selection is as deterministic as the
/// provider allows.
pub struct OpenAiOracle {
    client: Client<OpenAIConfig>,
    model: String,
    api_key_for_logging: String,
}

impl OpenAiOracle {
    /// Builds the client from configuration. The credential was already
    /// validated at startup by [`OracleConfig::from_env`].
    pub fn new(config: OracleConfig) -> Self {
        let api_key_for_logging = config.api_key.clone();
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key)
            .with_api_base(config.base_url);
        Self {
            client: Client::with_config(openai_config),
            model: config.model,
            api_key_for_logging,
        }
    }

    fn to_request_message(message: &OracleMessage) -> Result<ChatCompletionRequestMessage> {
        let request_message: ChatCompletionRequestMessage = match message {
            OracleMessage::System(content) => ChatCompletionRequestSystemMessageArgs::default()
                .content(content.clone())
                .build()?
                .into(),
            OracleMessage::User(content) => ChatCompletionRequestUserMessageArgs::default()
                .content(content.clone())
                .build()?
                .into(),
            OracleMessage::Assistant(content) => {
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(content.clone())
                    .build()?
                    .into()
            }
            OracleMessage::AssistantToolCall {
                id,
                name,
                arguments,
            } => ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(vec![ChatCompletionMessageToolCall {
                    id: id.clone(),
                    r#type: ChatCompletionToolType::Function,
                    function: FunctionCall {
                        name: name.clone(),
                        arguments: arguments.clone(),
                    },
                }])
                .build()?
                .into(),
            OracleMessage::ToolResult { call_id, content } => {
                ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(call_id.clone())
                    .content(content.clone())
                    .build()?
                    .into()
            }
        };
        Ok(request_message)
    }

    /// Advertises a descriptor as a function tool with a single required
    /// string parameter `input`.
    fn to_function_tool(descriptor: &ToolDescriptor) -> Result<ChatCompletionTool> {
        let tool = ChatCompletionToolArgs::default()
            .r#type(ChatCompletionToolType::Function)
            .function(
                FunctionObjectArgs::default()
                    .name(descriptor.name.clone())
                    .description(descriptor.description.clone())
                    .parameters(json!({
                        "type": "object",
                        "properties": {
                            "input": {
                                "type": "string",
                                "description": descriptor.input_contract,
                            }
                        },
                        "required": ["input"],
                    }))
                    .build()?,
            )
            .build()?;
        Ok(tool)
    }

    /// Extracts the tool input from the arguments payload. The advertised
    /// schema has one `input` field; a provider that returns something else
    /// falls back to the raw payload so the tool still sees text.
    fn extract_input(arguments: &str) -> String {
        serde_json::from_str::<serde_json::Value>(arguments)
            .ok()
            .and_then(|value| {
                value
                    .get("input")
                    .and_then(|input| input.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| arguments.trim().to_string())
    }
}

#[async_trait]
impl ReasoningOracle for OpenAiOracle {
    #[instrument(skip(self, transcript, tools))]
    async fn reason(
        &self,
        transcript: &[OracleMessage],
        tools: &[ToolDescriptor],
    ) -> Result<OracleAction> {
        let messages: Vec<ChatCompletionRequestMessage> = transcript
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<_>>()?;
        let function_tools: Vec<ChatCompletionTool> = tools
            .iter()
            .map(Self::to_function_tool)
            .collect::<Result<_>>()?;

        info!(
            model = %self.model,
            message_count = messages.len(),
            tool_count = function_tools.len(),
            api_key = %mask_token(&self.api_key_for_logging),
            "reasoning request"
        );

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder
            .model(&self.model)
            .messages(messages)
            .temperature(0.0);
        // Some providers reject an empty tools array outright.
        if !function_tools.is_empty() {
            builder.tools(function_tools);
        }
        let request = builder.build()?;

        let response = self.client.chat().create(request).await?;

        if let Some(ref usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "reasoning usage"
            );
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no choices in completion response"))?;

        if let Some(call) = choice.message.tool_calls.and_then(|mut calls| {
            if calls.is_empty() {
                None
            } else {
                Some(calls.remove(0))
            }
        }) {
            let input = Self::extract_input(&call.function.arguments);
            info!(tool = %call.function.name, "reasoning requested tool");
            return Ok(OracleAction::ToolCall {
                id: call.id,
                name: call.function.name,
                input,
                arguments: call.function.arguments,
            });
        }

        let answer = choice.message.content.unwrap_or_default();
        Ok(OracleAction::Final { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: the input field is extracted from the arguments object.**
    #[test]
    fn extract_input_from_schema_arguments() {
        let input = OpenAiOracle::extract_input(r#"{"input": "SELECT * FROM patients"}"#);
        assert_eq!(input, "SELECT * FROM patients");
    }

    /// **Test: non-conforming arguments fall back to the raw payload.**
    #[test]
    fn extract_input_falls_back_to_raw() {
        assert_eq!(
            OpenAiOracle::extract_input(r#"{"query": "q"}"#),
            r#"{"query": "q"}"#
        );
        assert_eq!(OpenAiOracle::extract_input("  plain text  "), "plain text");
    }

    /// **Test: descriptors map to function tools with the input schema.**
    #[test]
    fn descriptor_maps_to_function_tool() {
        let descriptor = ToolDescriptor {
            name: "web_search".to_string(),
            description: "Search the web.".to_string(),
            input_contract: "a free-text query".to_string(),
        };
        let tool = OpenAiOracle::to_function_tool(&descriptor).unwrap();
        assert_eq!(tool.function.name, "web_search");
        let parameters = tool.function.parameters.unwrap();
        assert_eq!(parameters["required"][0], "input");
    }
}
