//! Wires settings into a ready-to-run agent.

use std::sync::Arc;
use tracing::info;

use crate::agent::{Agent, AgentConfig, AgentError};
use crate::catalog::MovieCatalog;
use crate::config::Settings;
use crate::llm::LLMClientBuilder;
use crate::movies::{build_registry, MovieContext};
use crate::omdb::OmdbClient;
use crate::session::Session;
use crate::tool::ToolRegistry;

/// Builds the movie tools: OMDb client plus the local dataset, if it loads.
pub fn build_tools(settings: &Settings) -> Result<ToolRegistry, AgentError> {
    let omdb = OmdbClient::http(
        settings.omdb_api_url.clone(),
        settings.omdb_api_key.clone(),
        settings.omdb_timeout(),
    )?
    .with_policy(settings.retry_policy());

    let dataset = MovieCatalog::load(&settings.csv_dataset_path);
    let context = MovieContext::with_dataset(omdb, dataset);
    Ok(build_registry(Arc::new(context)))
}

/// Builds the agent described by `settings`.
pub fn build_agent(settings: &Settings) -> Result<Agent, AgentError> {
    let registry = build_tools(settings)?;

    let mut llm = LLMClientBuilder::new().with_timeout(std::time::Duration::from_secs(60));
    if let Some(api_key) = &settings.openai_api_key {
        llm = llm.with_api_key(api_key.clone());
    }
    if let Some(base_url) = &settings.openai_base_url {
        llm = llm.with_base_url(base_url.clone());
    }

    info!(
        model = %settings.model_name,
        tools = registry.len(),
        "Agent initialized"
    );

    Ok(Agent::new(
        Session::new(settings.model_config(), settings.system_prompt.clone()),
        llm.build_openai()?,
        Arc::new(registry),
        AgentConfig {
            max_steps: settings.max_steps,
        },
    ))
}
