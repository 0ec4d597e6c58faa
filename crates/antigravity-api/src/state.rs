//! Application state wiring the orchestrator together.
//!
//! The orchestrator is generic over its storage, persona source and provider;
//! AppState pins it to the concrete infra implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use antigravity_core::chat::orchestrator::ChatOrchestrator;
use antigravity_core::conversation::store::ConversationStore;
use antigravity_core::credential::pool::CredentialPool;
use antigravity_core::llm::worker::CompletionWorkers;
use antigravity_core::persona::registry::PersonaRegistry;
use antigravity_core::text::normalize::AbbreviationTable;
use antigravity_infra::credentials::{API_KEYS_ENV, load_credentials};
use antigravity_infra::llm::openai_compat::OpenAiCompatibleProvider;
use antigravity_infra::llm::openai_compat::config::OpenAiCompatConfig;
use antigravity_infra::persona::directory::DirectoryPersonaSource;
use antigravity_infra::storage::json_file::JsonFileKvStore;
use antigravity_types::config::AppConfig;
use antigravity_types::llm::GenerationSettings;

use crate::http::extractors::auth::hash_api_token;

/// Orchestrator pinned to the infra implementations.
pub type ConcreteOrchestrator =
    ChatOrchestrator<JsonFileKvStore, DirectoryPersonaSource, OpenAiCompatibleProvider>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: Arc<AppConfig>,
    /// SHA-256 digest of `server.api_token`; `None` disables the JSON API.
    pub api_token_hash: Option<Arc<str>>,
}

impl AppState {
    /// Load credentials and abbreviations, then wire the orchestrator.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", config.data_dir.display()))?;

        let credentials =
            load_credentials(&config.credentials_file(), std::env::var(API_KEYS_ENV).ok()).await;
        Self::with_credentials(config, credentials).await
    }

    /// Wire the orchestrator around an explicit credential list.
    pub async fn with_credentials(
        config: AppConfig,
        credentials: Vec<secrecy::SecretString>,
    ) -> anyhow::Result<Self> {
        let kv = Arc::new(JsonFileKvStore::new(&config.data_dir));
        let abbreviations = AbbreviationTable::load(kv.as_ref()).await;

        let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from(&config.llm))
            .context("failed to build completion client")?;
        let workers = CompletionWorkers::new(
            provider,
            config.llm.max_concurrent,
            Duration::from_secs(config.llm.timeout_secs.max(1)),
        );

        let orchestrator = ChatOrchestrator::new(
            CredentialPool::new(credentials),
            PersonaRegistry::new(DirectoryPersonaSource::new(config.profiles_dir())),
            ConversationStore::new(kv),
            abbreviations,
            workers,
        )
        .with_settings(GenerationSettings::with_model(config.llm.model.clone()))
        .with_admin(config.admin_user_id.clone());

        let api_token_hash: Option<Arc<str>> = config
            .server
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Arc::from(hash_api_token(token)));

        tracing::info!(
            data_dir = %config.data_dir.display(),
            profiles_dir = %config.profiles_dir().display(),
            model = %config.llm.model,
            credentials = orchestrator.credentials().len(),
            http_api = api_token_hash.is_some(),
            "application state initialized"
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            config: Arc::new(config),
            api_token_hash,
        })
    }
}
