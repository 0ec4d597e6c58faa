//! Persona document adapters.

pub mod directory;
