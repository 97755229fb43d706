//! Conversation history kept for the lifetime of the console session.

mod message;
mod session;

pub use message::{Message, MessageContent, MessageRole};
pub use session::{ModelConfig, Session};
