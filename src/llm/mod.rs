pub mod client;
pub mod openai;

pub use client::{FinishReason, LLMClient, LLMClientBuilder, LLMError, LLMInput, LLMOutput, Usage};
pub use openai::OpenAIClient;

#[cfg(test)]
pub use client::MockLLMClient;
