//! Logging sidecar subsystem.
//!
//! # Data Flow
//! ```text
//! producer → log file (NDJSON)
//!     → tailer.rs    (new lines only, polling)
//!     → LogRecord::parse_line
//!     → enricher.rs  (sidecar_timestamp, sidecar_forwarded_by, environment)
//!     → forwarder.rs (one POST, bounded timeout, no retry)
//!     → collector
//! ```
//!
//! `driver.rs` composes the stages and keeps failures per line.

pub mod driver;
pub mod enricher;
pub mod forwarder;
pub mod tailer;

pub use driver::{LineOutcome, Sidecar};
pub use enricher::{enrich, Enricher};
pub use forwarder::{ForwardOutcome, Forwarder, ForwarderError};
pub use tailer::Tailer;
