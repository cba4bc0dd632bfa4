//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`metrics`]: Prometheus-compatible request metrics.
//!
//! Request tracing comes from `tower_http::trace::TraceLayer`, applied in
//! the router assembly; authentication lives in [`crate::auth`].

pub mod metrics;
