use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::openai::OpenAIClient;
use crate::session::{Message, MessageContent};
use crate::tool::ToolDefinition;

/// Input for an LLM request.
#[derive(Debug, Clone)]
pub struct LLMInput {
    pub model: String,
    /// Conversation history, oldest first
    pub messages: Vec<Message>,
    pub system_prompt: String,
    /// Tools the model may call
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Output from an LLM response.
#[derive(Debug, Clone)]
pub struct LLMOutput {
    /// Text and tool calls, in the order the model produced them
    pub content: Vec<MessageContent>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

/// The reason the LLM finished generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    MaxTokens,
    Error,
}

impl FinishReason {
    /// Maps the provider's `finish_reason` string.
    pub fn from_provider(reason: Option<&str>) -> Self {
        match reason {
            Some("stop") => FinishReason::Stop,
            Some("tool_calls") | Some("function_call") => FinishReason::ToolCalls,
            Some("length") => FinishReason::MaxTokens,
            _ => FinishReason::Error,
        }
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors that can occur when communicating with an LLM.
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimitError(String),
}

/// A chat model that can answer with text or tool calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Sends a request and returns the complete response.
    async fn complete(&self, input: LLMInput) -> Result<LLMOutput, LLMError>;
}

/// A builder for creating LLM clients.
#[derive(Debug, Default)]
pub struct LLMClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl LLMClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Creates an OpenAI client, falling back to `OPENAI_API_KEY` for the key.
    pub fn build_openai(self) -> Result<Arc<dyn LLMClient>, LLMError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LLMError::AuthError("OpenAI API key not provided".to_string()))?;

        Ok(Arc::new(OpenAIClient::new(api_key, self.base_url, self.timeout)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_provider(Some("stop")), FinishReason::Stop);
        assert_eq!(FinishReason::from_provider(Some("tool_calls")), FinishReason::ToolCalls);
        assert_eq!(FinishReason::from_provider(Some("length")), FinishReason::MaxTokens);
        assert_eq!(FinishReason::from_provider(None), FinishReason::Error);
    }

    #[test]
    fn test_builder_uses_explicit_key() {
        let client = LLMClientBuilder::new()
            .with_api_key("sk-test")
            .with_base_url("http://localhost:1")
            .build_openai();
        assert!(client.is_ok());
    }
}
