//! OpenRouter chat-completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AssistantReply, ChatMessage, LlmClient, LlmError, ToolSchema};

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for the OpenRouter chat-completions endpoint.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("valid reqwest client config");

        Self {
            client,
            api_key,
            base_url: OPENROUTER_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for proxies or compatible providers).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSchema]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<AssistantReply, LlmError> {
        let request = ChatRequest {
            model,
            messages,
            tools,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed.choices.into_iter().next().ok_or(LlmError::NoChoices)?;

        Ok(AssistantReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
        })
    }
}
