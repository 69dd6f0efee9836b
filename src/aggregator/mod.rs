//! Log aggregator subsystem.
//!
//! # Data Flow
//! ```text
//! sidecar POST /logs
//!     → handlers.rs (validate body is a JSON object)
//!     → store.rs    (stamp aggregator_received_at, append under lock)
//!
//! operator GET /logs, /logs/count, POST /logs/clear, GET /health
//!     → handlers.rs → store.rs (snapshot reads / clear)
//! ```

pub mod error;
pub mod handlers;
pub mod server;
pub mod store;

pub use error::ApiError;
pub use server::{AggregatorServer, AppState};
pub use store::{LogStore, OriginCounts, StoreError};
