//! Persona document source trait.
//!
//! Implementations live in antigravity-infra (a directory of JSON files).
//! [`MemoryPersonaSource`] holds raw documents in memory.

use std::collections::BTreeMap;

use antigravity_types::error::{PersonaError, StorageError};
use antigravity_types::persona::{Persona, PersonaDocument};

/// Trait for persona document stores keyed by id.
pub trait PersonaSource: Send + Sync {
    /// Ids of every document in the source, sorted.
    fn ids(&self) -> impl std::future::Future<Output = Result<Vec<String>, StorageError>> + Send;

    /// Load and resolve one persona.
    ///
    /// Absent documents yield [`PersonaError::NotFound`]; unparsable ones
    /// yield [`PersonaError::Invalid`].
    fn load(&self, id: &str) -> impl std::future::Future<Output = Result<Persona, PersonaError>> + Send;
}

/// Parse raw JSON document text into a persona.
pub fn parse_document(id: &str, raw: &str) -> Result<Persona, PersonaError> {
    let doc: PersonaDocument = serde_json::from_str(raw).map_err(|e| PersonaError::Invalid {
        id: id.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Persona::from_document(id, doc))
}

/// Persona source backed by in-memory document text.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersonaSource {
    documents: BTreeMap<String, String>,
}

impl MemoryPersonaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: &str, raw: impl Into<String>) -> Self {
        self.documents.insert(id.to_string(), raw.into());
        self
    }
}

impl PersonaSource for MemoryPersonaSource {
    async fn ids(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.documents.keys().cloned().collect())
    }

    async fn load(&self, id: &str) -> Result<Persona, PersonaError> {
        let raw = self
            .documents
            .get(id)
            .ok_or_else(|| PersonaError::NotFound(id.to_string()))?;
        parse_document(id, raw)
    }
}
