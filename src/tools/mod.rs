//! Tools the agent can invoke mid-reasoning.
//!
//! Each tool declares a JSON-schema parameter description that is sent to
//! the LLM with every completion request; the registry dispatches the
//! model's tool calls by name.

mod web_search;

pub use web_search::WebSearch;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::ToolSchema;

/// A callable capability exposed to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with model-supplied arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool, for prompt rendering.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of tools available to the agent.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool to the registry.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// List registered tools (name + description).
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Render tool declarations for the LLM request.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema::function(t.name(), t.description(), t.parameters_schema()))
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;

        tool.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase the input text."
        }

        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }

        async fn execute(&self, args: Value) -> anyhow::Result<String> {
            let text = args["text"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Missing 'text' argument"))?;
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_registry_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(UpperTool));

        let result = registry
            .execute("upper", json!({"text": "hello"}))
            .await
            .unwrap();
        assert_eq!(result, "HELLO");
    }

    #[tokio::test]
    async fn test_registry_rejects_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn test_schemas_carry_name_and_parameters() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(UpperTool));

        let schemas = registry.get_tool_schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].function.name, "upper");
        assert_eq!(schemas[0].schema_type, "function");
        assert_eq!(schemas[0].function.parameters["required"][0], "text");
    }
}
