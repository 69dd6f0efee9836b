//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! sidecar driver / aggregator handlers
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges, optional Prometheus endpoint)
//! ```

pub mod logging;
pub mod metrics;
