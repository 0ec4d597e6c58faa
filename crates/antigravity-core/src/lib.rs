//! Chat orchestration logic and port traits for Antigravity.
//!
//! This crate defines the ports (storage, persona source, completion provider)
//! that the infrastructure layer implements, plus the stateful pieces built on
//! them. It depends only on `antigravity-types` -- never on
//! `antigravity-infra` or any filesystem/HTTP crate.

pub mod chat;
pub mod conversation;
pub mod credential;
pub mod llm;
pub mod persona;
pub mod storage;
pub mod text;
