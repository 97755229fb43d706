//! # cinema-expert
//!
//! A conversational movie assistant: a chat model answers questions about
//! films by calling typed tools backed by the OMDb API and a local IMDb Top
//! 1000 dataset.
//!
//! ## Features
//!
//! - **OMDb client**: bounded retries with backoff and outcome classification
//! - **Local dataset**: genre, director, actor and rating queries over the CSV
//! - **Tool System**: nine movie tools with JSON Schema arguments
//! - **Agent loop**: multi-step tool calling against an OpenAI-compatible API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cinema_expert::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = load_settings(None)?;
//!     let agent = build_agent(&settings)?;
//!
//!     let reply = agent.run("Кто снял фильм Heat?").await?;
//!     println!("{}", reply.text);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod llm;
pub mod movies;
pub mod omdb;
pub mod session;
pub mod tool;

// Re-exports for convenient usage
pub use agent::{Agent, AgentConfig, AgentReply, AgentStep};
pub use error::AgentError;
pub use llm::{LLMClient, LLMClientBuilder, LLMInput, LLMOutput, OpenAIClient};
pub use omdb::{LookupOutcome, LookupRequest, MovieRecord, OmdbClient};
pub use session::{Message, MessageContent, MessageRole, ModelConfig, Session};
pub use tool::{DynTool, Tool, ToolDefinition, ToolError, ToolExecutor, ToolRegistry, ToolResult};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::agent::{Agent, AgentConfig, AgentReply};
    pub use crate::assistant::{build_agent, build_tools};
    pub use crate::config::{load_settings, Settings};
    pub use crate::omdb::{LookupOutcome, LookupRequest, OmdbClient};
    pub use crate::tool::{Tool, ToolRegistry, ToolResult, ToolError};
}
