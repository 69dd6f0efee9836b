//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → config file (TOML, optional)        loader.rs
//!     → environment overrides               loader.rs
//!     → semantic checks                     validation.rs
//!     → SidecarConfig / AggregatorConfig (immutable once loaded)
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_aggregator_config, load_sidecar_config, ConfigError};
pub use schema::{AggregatorConfig, ObservabilityConfig, SidecarConfig};
