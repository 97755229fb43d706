use std::sync::Arc;
use tracing::{debug, warn};

use crate::session::MessageContent;
use crate::tool::{ToolDefinition, ToolError, ToolRegistry};

/// Runs tool calls requested by the model and turns every outcome into text.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    /// Creates a new tool executor over a shared registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Returns all tool definitions for passing to the LLM.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.to_tool_definitions()
    }

    /// Executes a single tool call.
    ///
    /// Unknown tools and tool errors are reported as error results, never
    /// propagated.
    pub async fn execute(&self, call: &MessageContent) -> MessageContent {
        let MessageContent::ToolCall {
            id,
            name,
            arguments,
        } = call
        else {
            return MessageContent::ToolResult {
                tool_call_id: String::new(),
                result: "Invalid tool call content".to_string(),
                is_error: Some(true),
            };
        };

        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Model requested an unknown tool");
            return MessageContent::ToolResult {
                tool_call_id: id.clone(),
                result: ToolError::NotFound(name.clone()).to_string(),
                is_error: Some(true),
            };
        };

        debug!(tool = %name, args = %arguments, "Executing tool");

        match tool.execute(arguments.clone()).await {
            Ok(result) => MessageContent::ToolResult {
                tool_call_id: id.clone(),
                result: result.output,
                is_error: result.is_error.then_some(true),
            },
            Err(error) => {
                warn!(tool = %name, %error, "Tool invocation rejected");
                MessageContent::ToolResult {
                    tool_call_id: id.clone(),
                    result: error.to_string(),
                    is_error: Some(true),
                }
            }
        }
    }

    /// Executes tool calls one after another, in the order requested.
    pub async fn execute_all(&self, calls: &[MessageContent]) -> Vec<MessageContent> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            results.push(self.execute(call).await);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{parse_arguments, Tool, ToolResult};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::{json, Value};

    struct Echo;

    #[derive(Deserialize)]
    struct EchoArgs {
        text: String,
    }

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes text"
        }

        fn parameters_schema(&self) -> Value {
            json!({"type": "object", "required": ["text"]})
        }

        async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
            let args: EchoArgs = parse_arguments(args)?;
            Ok(ToolResult::ok(args.text))
        }
    }

    fn executor() -> ToolExecutor {
        ToolExecutor::new(Arc::new(ToolRegistry::new().with(Arc::new(Echo))))
    }

    fn call(name: &str, arguments: Value) -> MessageContent {
        MessageContent::ToolCall {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_execute_returns_text() {
        let result = executor().execute(&call("echo", json!({"text": "hi"}))).await;
        match result {
            MessageContent::ToolResult { tool_call_id, result, is_error } => {
                assert_eq!(tool_call_id, "call_1");
                assert_eq!(result, "hi");
                assert_eq!(is_error, None);
            }
            other => panic!("unexpected content: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tool_errors_become_text() {
        let results = executor()
            .execute_all(&[call("echo", json!({})), call("missing", json!({}))])
            .await;

        let texts: Vec<_> = results
            .iter()
            .map(|content| match content {
                MessageContent::ToolResult { result, is_error, .. } => {
                    assert_eq!(*is_error, Some(true));
                    result.as_str()
                }
                other => panic!("unexpected content: {:?}", other),
            })
            .collect();

        assert!(texts[0].starts_with("Invalid arguments:"));
        assert_eq!(texts[1], "Tool not found: missing");
    }

    #[test]
    fn test_non_call_content_is_rejected() {
        let result = tokio_test::block_on(
            executor().execute(&MessageContent::Text { text: "hello".into() }),
        );
        assert!(matches!(result, MessageContent::ToolResult { is_error: Some(true), .. }));
    }
}
