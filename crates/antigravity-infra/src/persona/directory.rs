//! Persona documents stored as `{profiles_dir}/{id}.json`.

use std::path::{Path, PathBuf};

use antigravity_core::persona::source::{PersonaSource, parse_document};
use antigravity_types::error::{PersonaError, StorageError};
use antigravity_types::persona::{Persona, is_valid_persona_id};

pub struct DirectoryPersonaSource {
    dir: PathBuf,
}

impl DirectoryPersonaSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

impl PersonaSource for DirectoryPersonaSource {
    async fn ids(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.dir.display(), "profiles directory missing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(StorageError::Io(format!("{}: {err}", self.dir.display()))),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.dir.display())))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn load(&self, id: &str) -> Result<Persona, PersonaError> {
        if !is_valid_persona_id(id) {
            return Err(PersonaError::NotFound(id.to_string()));
        }
        let path = self.document_path(id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersonaError::NotFound(id.to_string()));
            }
            Err(err) => {
                return Err(PersonaError::Invalid {
                    id: id.to_string(),
                    reason: err.to_string(),
                });
            }
        };
        parse_document(id, &raw)
    }
}
