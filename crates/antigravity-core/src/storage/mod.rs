//! Key-value storage port and an in-memory implementation.

pub mod kv_store;
pub mod memory;
