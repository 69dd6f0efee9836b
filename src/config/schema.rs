//! Configuration schema definitions.
//!
//! Both daemons are configured from the same building blocks. All types
//! derive Serde traits for deserialization from TOML files and every field
//! has a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the logging sidecar.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SidecarConfig {
    /// Path of the newline-delimited JSON file written by the producer.
    pub log_file: PathBuf,

    /// Collector ingest endpoint (e.g., "http://log-aggregator:8080/logs").
    pub aggregator_url: String,

    /// Origin identity of the service this sidecar is attached to.
    pub service_name: String,

    /// Environment tag stamped on every forwarded record.
    pub environment: String,

    /// Delay between polls while waiting for the file or for new lines.
    pub poll_interval_ms: u64,

    /// Upper bound for one forward call.
    pub forward_timeout_ms: u64,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl SidecarConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_millis(self.forward_timeout_ms)
    }
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("/logs/app.log"),
            aggregator_url: "http://log-aggregator:8080/logs".to_string(),
            service_name: "unknown-service".to_string(),
            environment: "docker-compose".to_string(),
            poll_interval_ms: 2_000,
            forward_timeout_ms: 5_000,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Configuration for the log aggregator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Name reported by the health endpoint.
    pub service_name: String,

    /// Largest accepted request body.
    pub max_body_bytes: usize,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            service_name: "log-aggregator".to_string(),
            max_body_bytes: 1024 * 1024,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Metrics exposition settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address for the metrics listener.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
