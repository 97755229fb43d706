//! Application settings.
//!
//! Resolution order, later wins: built-in defaults, `settings.toml`, `.env`,
//! then `CINEMA_EXPERT_AI_AGENT_*` environment variables.

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::omdb::RetryPolicy;
use crate::session::ModelConfig;

pub use error::ConfigError;
pub use loader::{load_settings, ENV_PREFIX, SETTINGS_PATH};

const DEFAULT_SYSTEM_PROMPT: &str = "Ты - AI-киноэксперт. Помогаешь пользователям находить \
информацию о фильмах и сериалах, сравнивать их и подбирать рекомендации. \
Для фактов о фильмах всегда используй доступные инструменты и не выдумывай данные. \
Отвечай на русском языке, кратко и по делу.";

/// Every tunable of the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key for the chat completions API.
    pub openai_api_key: Option<String>,
    /// Alternative OpenAI-compatible endpoint.
    pub openai_base_url: Option<String>,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub omdb_api_url: String,
    /// Without it every OMDb lookup fails with a configuration error.
    pub omdb_api_key: Option<String>,
    pub omdb_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_secs: f64,
    /// Relative paths resolve against the settings file directory.
    pub csv_dataset_path: PathBuf,
    /// Upper bound on LLM round trips per user message.
    pub max_steps: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model_name: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 300,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            omdb_api_url: "http://www.omdbapi.com/".to_string(),
            omdb_api_key: None,
            omdb_timeout_secs: 10,
            max_retries: 3,
            retry_delay_secs: 1.0,
            csv_dataset_path: PathBuf::from("data/imdb_top_1000.csv"),
            max_steps: 10,
        }
    }
}

impl Settings {
    pub fn omdb_timeout(&self) -> Duration {
        Duration::from_secs(self.omdb_timeout_secs)
    }

    /// Retry policy for OMDb lookups. Negative or non-finite delays mean no pause.
    pub fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::try_from_secs_f64(self.retry_delay_secs.max(0.0)).unwrap_or_default();
        RetryPolicy::new(self.max_retries, delay)
    }

    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            name: self.model_name.clone(),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        }
    }
}
