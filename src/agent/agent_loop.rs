use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::AgentError;
use crate::llm::{LLMClient, LLMInput};
use crate::session::{Message, MessageContent, Session};
use crate::tool::{ToolExecutor, ToolRegistry};

/// Configuration for the agent loop.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum LLM round trips per user message
    pub max_steps: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { max_steps: 10 }
    }
}

/// One tool invocation made while answering.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStep {
    pub tool: String,
    pub arguments: Value,
    pub output: String,
    pub is_error: bool,
}

/// The final answer plus the tool invocations that led to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentReply {
    pub text: String,
    pub steps: Vec<AgentStep>,
}

/// Runs the conversation: model call, tool calls, results back, repeat.
pub struct Agent {
    session: Mutex<Session>,
    llm_client: Arc<dyn LLMClient>,
    tool_executor: ToolExecutor,
    config: AgentConfig,
}

impl Agent {
    pub fn new(
        session: Session,
        llm_client: Arc<dyn LLMClient>,
        registry: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            llm_client,
            tool_executor: ToolExecutor::new(registry),
            config,
        }
    }

    /// Answers one user message, keeping it and the answer in the history.
    ///
    /// A failed turn is rolled back so the history never holds dangling
    /// tool calls.
    pub async fn run(&self, user_input: &str) -> Result<AgentReply, AgentError> {
        let mut session = self.session.lock().await;
        let checkpoint = session.message_count();
        session.add_message(Message::new_user(user_input));

        let result = self.run_loop(&mut session).await;
        if result.is_err() {
            session.truncate(checkpoint);
        }
        result
    }

    async fn run_loop(&self, session: &mut Session) -> Result<AgentReply, AgentError> {
        let tools = self.tool_executor.tool_definitions();
        let mut steps = Vec::new();

        for step in 1..=self.config.max_steps {
            let input = LLMInput {
                model: session.model.name.clone(),
                messages: session.messages.clone(),
                system_prompt: session.system_prompt.clone(),
                tools: tools.clone(),
                max_tokens: session.model.max_tokens,
                temperature: session.model.temperature,
            };

            debug!(step, "Calling LLM");
            let response = self.llm_client.complete(input).await?;
            let assistant_message = Message::new_assistant(response.content);
            let calls: Vec<MessageContent> =
                assistant_message.tool_calls().into_iter().cloned().collect();
            let text = assistant_message.text();
            session.add_message(assistant_message);

            if calls.is_empty() {
                info!(step, tools_used = steps.len(), "Agent finished");
                return Ok(AgentReply { text, steps });
            }

            debug!(count = calls.len(), "Executing tool calls");
            let results = self.tool_executor.execute_all(&calls).await;
            steps.extend(calls.iter().zip(&results).filter_map(|pair| match pair {
                (
                    MessageContent::ToolCall { name, arguments, .. },
                    MessageContent::ToolResult { result, is_error, .. },
                ) => Some(AgentStep {
                    tool: name.clone(),
                    arguments: arguments.clone(),
                    output: result.clone(),
                    is_error: is_error.unwrap_or(false),
                }),
                _ => None,
            }));
            session.add_message(Message::new_tool_result(results));
        }

        Err(AgentError::MaxStepsExceeded(self.config.max_steps))
    }

    /// Snapshot of the conversation history.
    pub async fn messages(&self) -> Vec<Message> {
        self.session.lock().await.messages.clone()
    }
}
