//! Configuration loading from disk and the environment.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{AggregatorConfig, SidecarConfig};
use crate::config::validation::{validate_aggregator, validate_sidecar, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the sidecar configuration.
///
/// Defaults are overlaid with the TOML file at `path` (if given), then with
/// the process environment, and the result is validated.
pub fn load_sidecar_config(path: Option<&Path>) -> Result<SidecarConfig, ConfigError> {
    let mut config: SidecarConfig = read_or_default(path)?;
    apply_sidecar_env(&mut config, |key| std::env::var(key).ok());
    validate_sidecar(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load the aggregator configuration. Same layering as [`load_sidecar_config`].
pub fn load_aggregator_config(path: Option<&Path>) -> Result<AggregatorConfig, ConfigError> {
    let mut config: AggregatorConfig = read_or_default(path)?;
    apply_aggregator_env(&mut config, |key| std::env::var(key).ok());
    validate_aggregator(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(T::default()),
    }
}

/// Apply `LOG_FILE`, `AGGREGATOR_URL`, `SERVICE_NAME` and `ENVIRONMENT`.
pub fn apply_sidecar_env<F>(config: &mut SidecarConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("LOG_FILE") {
        config.log_file = PathBuf::from(v);
    }
    if let Some(v) = lookup("AGGREGATOR_URL") {
        config.aggregator_url = v;
    }
    if let Some(v) = lookup("SERVICE_NAME") {
        config.service_name = v;
    }
    if let Some(v) = lookup("ENVIRONMENT") {
        config.environment = v;
    }
}

/// Apply `BIND_ADDRESS`.
pub fn apply_aggregator_env<F>(config: &mut AggregatorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("BIND_ADDRESS") {
        config.bind_address = v;
    }
}
