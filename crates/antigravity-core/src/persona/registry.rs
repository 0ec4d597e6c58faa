//! Persona registry: discovery plus the process-wide active persona.
//!
//! The active id sits behind a read-write lock. Reads never hold it across a
//! document load, so a switch applies from the next read onward.

use std::pin::Pin;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::Stream;

use antigravity_types::error::PersonaError;
use antigravity_types::persona::{DEFAULT_PERSONA_ID, Persona, PersonaSummary, is_valid_persona_id};

use super::prompt::{FALLBACK_PROMPT, render_system_prompt};
use super::source::PersonaSource;

pub struct PersonaRegistry<S: PersonaSource> {
    source: S,
    active: RwLock<String>,
}

impl<S: PersonaSource> PersonaRegistry<S> {
    /// Create a registry with `"default"` active.
    pub fn new(source: S) -> Self {
        Self {
            source,
            active: RwLock::new(DEFAULT_PERSONA_ID.to_string()),
        }
    }

    pub fn active_id(&self) -> String {
        self.read().clone()
    }

    /// Lazily enumerate persona summaries.
    ///
    /// Each call starts a fresh pass over the source. Documents that fail to
    /// load are skipped.
    pub fn list_available(&self) -> Pin<Box<dyn Stream<Item = PersonaSummary> + Send + '_>> {
        Box::pin(async_stream::stream! {
            let ids = match self.source.ids().await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to enumerate personas");
                    Vec::new()
                }
            };
            for id in ids {
                match self.source.load(&id).await {
                    Ok(persona) => yield persona.summary(),
                    Err(e) => tracing::debug!(persona = %id, error = %e, "skipping persona"),
                }
            }
        })
    }

    /// Load a persona by id.
    pub async fn load(&self, id: &str) -> Result<Persona, PersonaError> {
        if !is_valid_persona_id(id) {
            return Err(PersonaError::NotFound(id.to_string()));
        }
        self.source.load(id).await
    }

    /// System prompt for the active persona. Never fails.
    ///
    /// Falls back to the `"default"` persona, then to [`FALLBACK_PROMPT`].
    pub async fn active_prompt(&self) -> String {
        let active = self.active_id();
        match self.load(&active).await {
            Ok(persona) => return render_system_prompt(&persona),
            Err(e) => tracing::warn!(persona = %active, error = %e, "active persona unavailable"),
        }

        if active != DEFAULT_PERSONA_ID {
            match self.load(DEFAULT_PERSONA_ID).await {
                Ok(persona) => return render_system_prompt(&persona),
                Err(e) => tracing::warn!(error = %e, "default persona unavailable"),
            }
        }

        FALLBACK_PROMPT.to_string()
    }

    /// Summary of the active persona.
    pub async fn active_summary(&self) -> Result<PersonaSummary, PersonaError> {
        let active = self.active_id();
        self.load(&active).await.map(|p| p.summary())
    }

    /// Make `id` the active persona.
    ///
    /// The id is lowercased first. Corrupt documents count as not found, and
    /// on any error the active persona is left unchanged.
    pub async fn switch_active(
        &self,
        id: &str,
        requester_is_admin: bool,
    ) -> Result<PersonaSummary, PersonaError> {
        if !requester_is_admin {
            return Err(PersonaError::Unauthorized);
        }

        let id = id.trim().to_lowercase();
        let persona = self.load(&id).await.map_err(|e| {
            tracing::debug!(persona = %id, error = %e, "persona switch rejected");
            PersonaError::NotFound(id.clone())
        })?;

        *self.write() = persona.id.clone();
        tracing::info!(persona = %persona.id, "active persona switched");
        Ok(persona.summary())
    }

    fn read(&self) -> RwLockReadGuard<'_, String> {
        self.active.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, String> {
        self.active.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
