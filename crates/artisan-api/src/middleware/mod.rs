//! # Middleware
//!
//! - [`metrics`]: request and error counters, readable at `GET /metrics`.
//! - [`tracing_layer`]: per-request tracing spans.

pub mod metrics;
pub mod tracing_layer;
