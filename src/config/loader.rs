//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AppConfig, Environment};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then the process environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `BASE_URL`, `PORT` and `NODE_ENV` on top of file values.
fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup("BASE_URL").filter(|v| !v.is_empty()) {
        config.server.base_url = base_url;
    }

    if let Some(port) = lookup("PORT").filter(|v| !v.is_empty()) {
        let parsed = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port.clone() })?;
        config.server.port = Some(parsed);
    }

    if let Some(node_env) = lookup("NODE_ENV") {
        config.server.environment = Environment::from_node_env(&node_env);
    }

    Ok(())
}
