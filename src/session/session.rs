use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// The conversation so far plus the settings it runs with.
///
/// History grows without summarization for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub messages: Vec<Message>,
    pub system_prompt: String,
    pub model: ModelConfig,
}

/// Sampling settings sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// The model name (e.g., "gpt-4o-mini")
    pub name: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            temperature: Some(0.7),
        }
    }
}

impl Session {
    pub fn new(model: ModelConfig, system_prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
            system_prompt: system_prompt.into(),
            model,
        }
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Drops messages appended after `len`, undoing a failed turn.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ModelConfig::default(), "")
    }
}
