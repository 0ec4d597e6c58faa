//! Observability setup for Antigravity.

pub mod tracing_setup;
