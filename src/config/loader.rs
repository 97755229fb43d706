use dotenvy::from_path;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Once;
use tracing::debug;

use super::error::ConfigError;
use super::Settings;

/// Settings file looked up when no path is given.
pub const SETTINGS_PATH: &str = "settings.toml";

/// Prefix of environment variables that override settings.
pub const ENV_PREFIX: &str = "CINEMA_EXPERT_AI_AGENT_";

static ENV_LOADER: Once = Once::new();

/// Loads `.env` into the process environment once. Variables already set win.
fn ensure_env_loaded(path: &Path) {
    ENV_LOADER.call_once(|| {
        if from_path(path).is_ok() {
            debug!(path = %path.display(), "Loaded environment file");
        }
    });
}

/// Loads settings from `path`, or from `settings.toml` when it exists.
///
/// An explicitly given file must exist; the default one is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let (settings_path, required) = match path {
        Some(path) => (path, true),
        None => (Path::new(SETTINGS_PATH), false),
    };
    let root = settings_root(settings_path);
    ensure_env_loaded(&root.join(".env"));

    let mut settings = match read_settings(settings_path) {
        Ok(settings) => settings,
        Err(ConfigError::NotFound { .. }) if !required => {
            debug!("No settings file, using defaults");
            Settings::default()
        }
        Err(error) => return Err(error),
    };

    apply_env(&mut settings, std::env::vars())?;
    settings.csv_dataset_path = resolve_path(&root, &settings.csv_dataset_path);
    Ok(settings)
}

fn settings_root(settings_path: &Path) -> PathBuf {
    match settings_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    debug!(path = %path.display(), "Reading settings file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Overrides settings from `CINEMA_EXPERT_AI_AGENT_*` variables.
///
/// Names are case-insensitive after the prefix; unknown names are ignored and
/// blank values clear optional keys.
pub(crate) fn apply_env<I>(settings: &mut Settings, vars: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(name) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };

        match name.to_ascii_lowercase().as_str() {
            "openai_api_key" => settings.openai_api_key = optional(value),
            "openai_base_url" => settings.openai_base_url = optional(value),
            "model_name" => settings.model_name = value,
            "temperature" => settings.temperature = parse(&key, &value)?,
            "max_tokens" => settings.max_tokens = parse(&key, &value)?,
            "system_prompt" => settings.system_prompt = value,
            "omdb_api_url" => settings.omdb_api_url = value,
            "omdb_api_key" => settings.omdb_api_key = optional(value),
            "omdb_timeout_secs" => settings.omdb_timeout_secs = parse(&key, &value)?,
            "max_retries" => settings.max_retries = parse(&key, &value)?,
            "retry_delay_secs" => settings.retry_delay_secs = parse(&key, &value)?,
            "csv_dataset_path" => settings.csv_dataset_path = PathBuf::from(value),
            "max_steps" => settings.max_steps = parse(&key, &value)?,
            other => debug!(setting = other, "Ignoring unknown environment setting"),
        }
    }
    Ok(())
}

fn optional(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}
