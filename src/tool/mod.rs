pub mod executor;
pub mod registry;

pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use tool_args::{argument_schema, parse_arguments};
pub use tool_trait::{DynTool, Tool};
pub use tool_types::{ToolDefinition, ToolError, ToolResult};

mod tool_types {
    use serde::{Deserialize, Serialize};
    use serde_json::Value;

    /// What the orchestrating model sees of a tool.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ToolDefinition {
        /// The name the model calls the tool by
        pub name: String,
        /// What the tool does, shown to the model verbatim
        pub description: String,
        /// JSON Schema for the tool's arguments
        pub input_schema: Value,
    }

    /// Text produced by a tool invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ToolResult {
        /// Text handed back to the model
        pub output: String,
        /// Set when the text describes a failure
        pub is_error: bool,
    }

    impl ToolResult {
        /// Creates a successful result.
        pub fn ok(output: impl Into<String>) -> Self {
            Self {
                output: output.into(),
                is_error: false,
            }
        }

        /// Creates a result whose text reports a failure.
        pub fn error(output: impl Into<String>) -> Self {
            Self {
                output: output.into(),
                is_error: true,
            }
        }
    }

    /// Errors that stop a tool before it produces text.
    #[derive(Debug, thiserror::Error)]
    pub enum ToolError {
        #[error("Invalid arguments: {0}")]
        InvalidArguments(String),
        #[error("Tool not found: {0}")]
        NotFound(String),
    }
}

mod tool_trait {
    use super::tool_types::{ToolDefinition, ToolError, ToolResult};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    /// A named, schema-described callable the agent can invoke.
    #[async_trait]
    pub trait Tool: Send + Sync {
        /// Returns the name of the tool.
        fn name(&self) -> &str;
        /// Returns a description of what the tool does.
        fn description(&self) -> &str;
        /// Returns the JSON Schema for the tool's input parameters.
        fn parameters_schema(&self) -> Value;

        /// Executes the tool with the given arguments.
        async fn execute(&self, args: Value) -> Result<ToolResult, ToolError>;

        /// Converts the tool to its definition.
        fn to_definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input_schema: self.parameters_schema(),
            }
        }
    }

    /// A type alias for a dynamic tool reference.
    pub type DynTool = Arc<dyn Tool>;
}

mod tool_args {
    use super::tool_types::ToolError;
    use schemars::JsonSchema;
    use serde::de::DeserializeOwned;
    use serde_json::Value;

    /// Derives the argument schema from the struct the tool deserializes into.
    pub fn argument_schema<T: JsonSchema>() -> Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default();
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
            object.remove("title");
        }
        schema
    }

    /// Deserializes tool arguments, reporting missing or mistyped fields.
    pub fn parse_arguments<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };
        serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
    }

}
