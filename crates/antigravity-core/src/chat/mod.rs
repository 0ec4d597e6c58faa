//! End-to-end reply generation.

pub mod orchestrator;
