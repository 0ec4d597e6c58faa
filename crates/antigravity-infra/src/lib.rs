//! Infrastructure layer for Antigravity.
//!
//! Contains implementations of the port traits defined in `antigravity-core`:
//! JSON-file key-value storage, the persona document directory, and the
//! OpenAI-compatible completion client. Also loads configuration and
//! credentials.

pub mod config;
pub mod credentials;
pub mod llm;
pub mod persona;
pub mod storage;
