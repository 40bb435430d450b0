//! Shared building blocks for the directory service: logging setup,
//! runtime directory checks, wire types and Prometheus metrics.

pub mod env;
pub mod metrics;
pub mod types;
pub mod utils;
