//! ChatOrchestrator -- the "generate a reply" operation.
//!
//! Pipeline per message: expand abbreviations, record the user turn, compose
//! the prompt from the active persona and prior history, call the endpoint
//! with credential failover, sanitize, record the reply.
//!
//! Only authentication and rate-limit failures rotate the credential pool.
//! At most `max(1, pool size)` calls are made per reply.

use futures_util::StreamExt;
use serde::Serialize;

use antigravity_types::conversation::{ConversationEntry, Role};
use antigravity_types::error::ChatError;
use antigravity_types::llm::{CompletionRequest, GenerationSettings, Message};
use antigravity_types::persona::PersonaSummary;

use crate::conversation::store::ConversationStore;
use crate::credential::pool::CredentialPool;
use crate::llm::provider::LlmProvider;
use crate::llm::worker::CompletionWorkers;
use crate::persona::registry::PersonaRegistry;
use crate::persona::source::PersonaSource;
use crate::storage::kv_store::KvStore;
use crate::text::normalize::AbbreviationTable;
use crate::text::sanitize::sanitize;

/// Characters of a reply included in the completion log line.
const LOG_PREVIEW_CHARS: usize = 50;

/// Point-in-time view of the orchestrator, for status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratorStatus {
    pub provider: String,
    pub model: String,
    pub credentials: usize,
    pub credential_cursor: usize,
    pub active_persona: String,
    pub abbreviations: usize,
}

pub struct ChatOrchestrator<K: KvStore, S: PersonaSource, P: LlmProvider> {
    pool: CredentialPool,
    personas: PersonaRegistry<S>,
    conversations: ConversationStore<K>,
    abbreviations: AbbreviationTable,
    workers: CompletionWorkers<P>,
    settings: GenerationSettings,
    admin_user_id: Option<String>,
}

impl<K, S, P> ChatOrchestrator<K, S, P>
where
    K: KvStore,
    S: PersonaSource,
    P: LlmProvider + 'static,
{
    pub fn new(
        pool: CredentialPool,
        personas: PersonaRegistry<S>,
        conversations: ConversationStore<K>,
        abbreviations: AbbreviationTable,
        workers: CompletionWorkers<P>,
    ) -> Self {
        if pool.is_empty() {
            tracing::warn!("no API credentials configured, replies will be refused");
        }
        Self {
            pool,
            personas,
            conversations,
            abbreviations,
            workers,
            settings: GenerationSettings::default(),
            admin_user_id: None,
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The one user id allowed to switch personas.
    pub fn with_admin(mut self, admin_user_id: Option<String>) -> Self {
        self.admin_user_id = admin_user_id;
        self
    }

    pub fn credentials(&self) -> &CredentialPool {
        &self.pool
    }

    pub fn personas(&self) -> &PersonaRegistry<S> {
        &self.personas
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_user_id.as_deref() == Some(user_id)
    }

    /// Produce the reply to one user message.
    ///
    /// With an empty credential pool this fails immediately and records
    /// nothing.
    pub async fn generate_reply(&self, user_id: &str, raw_input: &str) -> Result<String, ChatError> {
        if self.pool.is_empty() {
            return Err(ChatError::NoCredentialsAvailable);
        }

        let input = self.abbreviations.expand(raw_input);
        let context = self.conversations.append_user_turn(user_id, &input).await;
        let system_prompt = self.personas.active_prompt().await;
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                Message::system(system_prompt),
                Message::user(format!("Chat History:\n{context}\n\nUser: {input}")),
            ],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let raw = self.invoke_with_failover(request).await?;
        let reply = sanitize(&raw);
        self.conversations.append(user_id, Role::Assistant, &reply).await;

        let preview: String = reply.chars().take(LOG_PREVIEW_CHARS).collect();
        tracing::info!(
            user_id,
            persona = %self.personas.active_id(),
            reply = %preview,
            "reply generated"
        );
        Ok(reply)
    }

    async fn invoke_with_failover(&self, request: CompletionRequest) -> Result<String, ChatError> {
        let max_attempts = self.pool.len().max(1);
        let mut attempts = 0;

        while attempts < max_attempts {
            let credential = self.pool.current()?;
            let index = credential.index();

            match self.workers.complete(credential, request.clone()).await {
                Ok(response) => return Ok(response.content),
                Err(err) if err.kind().rotates_credential() => {
                    tracing::warn!(
                        credential = index,
                        kind = %err.kind(),
                        error = %err,
                        "credential rejected, rotating"
                    );
                    if !self.pool.rotate() {
                        break;
                    }
                    attempts += 1;
                }
                Err(err) => {
                    tracing::error!(credential = index, kind = %err.kind(), error = %err, "completion failed");
                    return Err(ChatError::ModelInvocation(err));
                }
            }
        }

        tracing::error!(attempts, "all credentials exhausted");
        Err(ChatError::AllCredentialsExhausted { attempts })
    }

    /// Switch the active persona on behalf of `user_id`.
    pub async fn switch_persona(&self, user_id: &str, persona_id: &str) -> Result<PersonaSummary, ChatError> {
        let is_admin = self.is_admin(user_id);
        if !is_admin {
            tracing::warn!(user_id, persona = persona_id, "persona switch denied");
        }
        Ok(self.personas.switch_active(persona_id, is_admin).await?)
    }

    pub async fn active_persona(&self) -> Result<PersonaSummary, ChatError> {
        Ok(self.personas.active_summary().await?)
    }

    pub async fn list_personas(&self) -> Vec<PersonaSummary> {
        self.personas.list_available().collect().await
    }

    pub async fn history(&self, user_id: &str) -> Vec<ConversationEntry> {
        self.conversations.history(user_id).await
    }

    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            provider: self.workers.provider_name().to_string(),
            model: self.settings.model.clone(),
            credentials: self.pool.len(),
            credential_cursor: self.pool.cursor(),
            active_persona: self.personas.active_id(),
            abbreviations: self.abbreviations.len(),
        }
    }
}
