//! HTTP server.
//!
//! - [`api`]: Request/response types, router and route handlers
//! - [`error`]: API error type and status code mapping
//! - [`metrics`]: Prometheus counters for predictions and failures

pub mod api;
pub mod error;
pub mod metrics;
