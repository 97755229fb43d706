mod agent_loop;

pub use agent_loop::{Agent, AgentConfig, AgentReply, AgentStep};
pub use crate::error::AgentError;
