//! Persona discovery, loading, prompt rendering and the active selection.

pub mod prompt;
pub mod registry;
pub mod source;
