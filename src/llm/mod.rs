//! LLM provider client: chat completions with native tool calling.
//!
//! The wire types follow the OpenAI-compatible chat protocol that
//! OpenRouter exposes. `LlmClient` is the seam between the agent loop and
//! the provider, so tests can substitute a scripted client.

mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat completion returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("chat completion response contained no choices")]
    NoChoices,
}

/// Message role in the chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in the chat transcript.
///
/// `tool_calls` is set on assistant messages that request tool execution;
/// `tool_call_id` ties a tool-result message back to the call it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// The function half of a tool call. `arguments` is a JSON-encoded string,
/// as the protocol delivers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Declaration of a callable tool, sent with each completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    pub fn function(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            schema_type: "function".to_string(),
            function: FunctionSchema {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }
}

/// The model's reply to one completion call: either plain content, or one
/// or more tool-call requests (possibly alongside interim content).
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Client for a chat-completion provider with tool-calling support.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<AssistantReply, LlmError>;
}
