//! Key-value storage adapters.

pub mod json_file;
