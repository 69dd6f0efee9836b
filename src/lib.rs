//! Logging sidecar and log aggregator.
//!
//! A sidecar tails a service's newline-delimited JSON log file, enriches
//! each record with provenance and forwards it to the aggregator, which keeps
//! every accepted record in memory and serves it back over HTTP.

pub mod aggregator;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod record;
pub mod sidecar;

pub use aggregator::{AggregatorServer, LogStore};
pub use config::{AggregatorConfig, SidecarConfig};
pub use lifecycle::Shutdown;
pub use record::LogRecord;
pub use sidecar::{ForwardOutcome, Sidecar};
