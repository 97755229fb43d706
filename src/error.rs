//! Error type surfaced by the agent and its setup.

use thiserror::Error;

/// Unified error type for building and running the assistant.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    LLM(#[from] crate::llm::LLMError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The OMDb HTTP client could not be built
    #[error("OMDb client error: {0}")]
    Transport(#[from] crate::omdb::TransportError),

    /// The model kept calling tools past the step limit
    #[error("Max steps exceeded ({0})")]
    MaxStepsExceeded(usize),
}
