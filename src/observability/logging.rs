//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber for a binary
//! - Honour `RUST_LOG`, falling back to a per-binary default filter

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str =
    "observability_sidecar=info,log_aggregator=info,logging_sidecar=info,tower_http=info";

/// Install the global subscriber. Safe to call once per process.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
