//! Shared domain types for Antigravity.
//!
//! Personas, conversation entries, completion requests, configuration and the
//! error taxonomy used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod persona;
