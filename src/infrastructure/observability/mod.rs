//! Observability for the forecast service
//!
//! Metrics live in a private Prometheus registry and are scraped from the
//! `/metrics` endpoint. Logs go through `tracing`.

pub mod metrics;

pub use metrics::Metrics;
