//! Per-user bounded conversation history.

pub mod store;
