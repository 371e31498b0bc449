//! Shared configuration, error types, IDs, and metrics for the regional revenue query crates.
//!
//! Architecture role:
//! - defines the query configuration passed from the client into the engine
//! - provides common [`RvqError`] / [`Result`] contracts
//! - hosts typed table keys and the Prometheus metrics registry
//!
//! Key modules:
//! - [`config`]
//! - [`error`]
//! - [`ids`]
//! - [`metrics`]

pub mod config;
pub mod error;
pub mod ids;
pub mod metrics;

pub use config::{QueryConfig, QuerySettings, default_workers};
pub use error::{Result, RvqError};
pub use ids::*;
pub use metrics::MetricsRegistry;
