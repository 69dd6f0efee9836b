//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, addresses parse)
//! - Report every problem at once, not just the first

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{AggregatorConfig, ObservabilityConfig, SidecarConfig};

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL `{value}`: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

pub fn validate_sidecar(config: &SidecarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.aggregator_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field: "aggregator_url",
            value: config.aggregator_url.clone(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field: "aggregator_url",
            value: config.aggregator_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.service_name.trim().is_empty() {
        errors.push(ValidationError::Empty("service_name"));
    }
    if config.log_file.as_os_str().is_empty() {
        errors.push(ValidationError::Empty("log_file"));
    }
    if config.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("poll_interval_ms"));
    }
    if config.forward_timeout_ms == 0 {
        errors.push(ValidationError::Zero("forward_timeout_ms"));
    }
    validate_observability(&config.observability, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_aggregator(config: &AggregatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "bind_address",
            value: config.bind_address.clone(),
        });
    }
    if config.service_name.trim().is_empty() {
        errors.push(ValidationError::Empty("service_name"));
    }
    if config.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("max_body_bytes"));
    }
    validate_observability(&config.observability, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_observability(config: &ObservabilityConfig, errors: &mut Vec<ValidationError>) {
    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.metrics_address.clone(),
        });
    }
}
