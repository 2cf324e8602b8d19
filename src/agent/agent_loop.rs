//! Core agent loop implementation.

use std::sync::Arc;

use crate::api::types::ResearchResponse;
use crate::config::Config;
use crate::llm::{ChatMessage, LlmClient, OpenRouterClient, Role, ToolCall};
use crate::tools::{ToolRegistry, WebSearch};

use super::parser::parse_research_response;
use super::prompt::build_system_prompt;

/// The research agent.
///
/// Constructed once at startup and shared read-only across requests; every
/// invocation of [`Agent::run_query`] carries its own transcript.
pub struct Agent {
    config: Config,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
}

/// Executor state between transitions.
enum AgentState {
    /// Waiting on the model's next reply.
    Reasoning,
    /// The model requested tool calls that have not been executed yet.
    AwaitingToolResults(Vec<ToolCall>),
    /// The model produced a final, schema-valid answer.
    Done(ResearchResponse),
    /// Terminal failure.
    Failed(anyhow::Error),
}

impl Agent {
    /// Create a new agent with the given configuration.
    pub fn new(config: Config) -> Self {
        let llm = Arc::new(OpenRouterClient::new(config.api_key.clone()));
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(WebSearch::new(
            config.tavily_api_key.clone(),
            config.search_max_results,
        )));

        Self { config, llm, tools }
    }

    /// Create an agent with a custom client and tool set (useful for testing).
    pub fn with_client(config: Config, llm: Arc<dyn LlmClient>, tools: ToolRegistry) -> Self {
        Self { config, llm, tools }
    }

    /// The model used when a request does not override it.
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Run a research query and return the parsed structured response.
    pub async fn run_query(
        &self,
        query: &str,
        model: Option<&str>,
    ) -> anyhow::Result<ResearchResponse> {
        let model = model.unwrap_or(&self.config.default_model);

        // Build initial messages
        let system_prompt = build_system_prompt(&self.tools);
        let mut messages = vec![
            ChatMessage {
                role: Role::System,
                content: Some(system_prompt),
                tool_calls: None,
                tool_call_id: None,
            },
            ChatMessage {
                role: Role::User,
                content: Some(query.to_string()),
                tool_calls: None,
                tool_call_id: None,
            },
        ];

        // Get tool schemas for LLM
        let tool_schemas = self.tools.get_tool_schemas();

        let mut state = AgentState::Reasoning;
        let mut iterations = 0usize;

        loop {
            state = match state {
                AgentState::Reasoning => {
                    iterations += 1;
                    if iterations > self.config.max_iterations {
                        AgentState::Failed(anyhow::anyhow!(
                            "Max iterations ({}) reached without completion",
                            self.config.max_iterations
                        ))
                    } else {
                        tracing::debug!("Agent iteration {}", iterations);
                        match self
                            .llm
                            .chat_completion(model, &messages, Some(&tool_schemas))
                            .await
                        {
                            Ok(reply) => match (reply.tool_calls, reply.content) {
                                (Some(tool_calls), content) if !tool_calls.is_empty() => {
                                    // Add assistant message with tool calls
                                    messages.push(ChatMessage {
                                        role: Role::Assistant,
                                        content,
                                        tool_calls: Some(tool_calls.clone()),
                                        tool_call_id: None,
                                    });
                                    AgentState::AwaitingToolResults(tool_calls)
                                }
                                (_, Some(content)) => match parse_research_response(&content) {
                                    Ok(response) => AgentState::Done(response),
                                    Err(e) => AgentState::Failed(e.into()),
                                },
                                _ => AgentState::Failed(anyhow::anyhow!(
                                    "LLM returned a reply with no content and no tool calls"
                                )),
                            },
                            Err(e) => AgentState::Failed(e.into()),
                        }
                    }
                }

                AgentState::AwaitingToolResults(tool_calls) => {
                    for tool_call in &tool_calls {
                        tracing::debug!(
                            "Calling tool: {} with args: {}",
                            tool_call.function.name,
                            tool_call.function.arguments
                        );

                        let result = self.execute_tool_call(tool_call).await;

                        // Tool errors are fed back to the model as results, not
                        // propagated; the model may recover or rephrase.
                        let result_str = match result {
                            Ok(output) => output,
                            Err(e) => format!("Error: {}", e),
                        };

                        tracing::debug!("Tool result: {}", truncate_for_log(&result_str, 1000));

                        messages.push(ChatMessage {
                            role: Role::Tool,
                            content: Some(result_str),
                            tool_calls: None,
                            tool_call_id: Some(tool_call.id.clone()),
                        });
                    }
                    AgentState::Reasoning
                }

                AgentState::Done(response) => {
                    tracing::debug!(
                        "Research complete: topic={}, {} sources",
                        response.topic,
                        response.sources.len()
                    );
                    return Ok(response);
                }

                AgentState::Failed(e) => return Err(e),
            };
        }
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}... [truncated]", &s[..max_len])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::llm::testing::ScriptedClient;
    use crate::llm::{AssistantReply, FunctionCall};
    use crate::tools::Tool;

    fn test_config(max_iterations: usize) -> Config {
        let mut config = Config::new(
            "llm-key".to_string(),
            "search-key".to_string(),
            "test-model".to_string(),
        );
        config.max_iterations = max_iterations;
        config
    }

    fn tool_call_reply(name: &str, arguments: &str) -> AssistantReply {
        AssistantReply {
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: "call_1".to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            }]),
        }
    }

    fn final_reply(body: &str) -> AssistantReply {
        AssistantReply {
            content: Some(body.to_string()),
            tool_calls: None,
        }
    }

    const FINAL_JSON: &str = r#"{
        "topic": "rust",
        "summary": "a systems language",
        "sources": ["https://rust-lang.org"],
        "tools_used": ["web_search"]
    }"#;

    /// Records the arguments of every call it receives.
    struct RecordingTool {
        calls: Mutex<Vec<Value>>,
    }

    impl RecordingTool {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            "web_search"
        }

        fn description(&self) -> &str {
            "Pretend search."
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "properties": {"query": {"type": "string"}}})
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(args);
            Ok("result: rust is a systems language".to_string())
        }
    }

    #[tokio::test]
    async fn test_tool_round_trip_then_final_answer() {
        let llm = Arc::new(ScriptedClient::new(vec![
            tool_call_reply("web_search", r#"{"query": "rust"}"#),
            final_reply(FINAL_JSON),
        ]));
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(RecordingTool::new()));

        let agent = Agent::with_client(test_config(10), llm, tools);
        let response = agent.run_query("what is rust", None).await.unwrap();

        assert_eq!(response.topic, "rust");
        assert_eq!(response.sources, vec!["https://rust-lang.org"]);
        assert_eq!(response.tools_used, vec!["web_search"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_error_is_fed_back_not_fatal() {
        let llm = Arc::new(ScriptedClient::new(vec![
            tool_call_reply("no_such_tool", "{}"),
            final_reply(FINAL_JSON),
        ]));

        let agent = Agent::with_client(test_config(10), llm, ToolRegistry::new());
        let response = agent.run_query("q", None).await.unwrap();
        assert_eq!(response.topic, "rust");
    }

    #[tokio::test]
    async fn test_iteration_cap_terminates_loop() {
        let llm = Arc::new(ScriptedClient::new(vec![
            tool_call_reply("web_search", r#"{"query": "a"}"#),
            tool_call_reply("web_search", r#"{"query": "b"}"#),
            tool_call_reply("web_search", r#"{"query": "c"}"#),
        ]));
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(RecordingTool::new()));

        let agent = Agent::with_client(test_config(2), llm, tools);
        let err = agent.run_query("q", None).await.unwrap_err();
        assert!(err.to_string().contains("Max iterations"));
    }

    #[tokio::test]
    async fn test_unparseable_final_answer_is_an_error() {
        let llm = Arc::new(ScriptedClient::new(vec![final_reply(
            "here's what I found: rust is great",
        )]));

        let agent = Agent::with_client(test_config(10), llm, ToolRegistry::new());
        assert!(agent.run_query("q", None).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let llm = Arc::new(ScriptedClient::new(vec![AssistantReply {
            content: None,
            tool_calls: None,
        }]));

        let agent = Agent::with_client(test_config(10), llm, ToolRegistry::new());
        let err = agent.run_query("q", None).await.unwrap_err();
        assert!(err.to_string().contains("no content and no tool calls"));
    }
}
