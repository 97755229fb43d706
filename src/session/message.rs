use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
    pub created_at: DateTime<Utc>,
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    /// The language model
    Assistant,
    /// Tool results fed back to the model
    Tool,
}

/// One piece of a message: text, a tool call or a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text {
        text: String,
    },
    /// A tool call requested by the model
    ToolCall {
        /// Provider-assigned id, echoed back in the result
        id: String,
        name: String,
        arguments: Value,
    },
    /// The text a tool produced for a call
    ToolResult {
        tool_call_id: String,
        result: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

impl Message {
    fn with_role(role: MessageRole, content: Vec<MessageContent>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn new_user(text: impl Into<String>) -> Self {
        Self::with_role(MessageRole::User, vec![MessageContent::Text { text: text.into() }])
    }

    pub fn new_assistant(content: Vec<MessageContent>) -> Self {
        Self::with_role(MessageRole::Assistant, content)
    }

    pub fn new_tool_result(results: Vec<MessageContent>) -> Self {
        Self::with_role(MessageRole::Tool, results)
    }

    /// All text parts joined together.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|content| match content {
                MessageContent::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The tool calls in this message, in the order the model issued them.
    pub fn tool_calls(&self) -> Vec<&MessageContent> {
        self.content
            .iter()
            .filter(|content| matches!(content, MessageContent::ToolCall { .. }))
            .collect()
    }
}
