//! Configuration and defaults for OpenAI-compatible endpoints.

use std::time::Duration;

use antigravity_types::config::LlmConfig;

/// Configuration for an [`super::OpenAiCompatibleProvider`].
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "cerebras").
    pub provider_name: String,
    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Transport-level timeout for one HTTP call.
    pub timeout: Duration,
}

/// Cerebras inference API defaults.
///
/// Base URL: `https://api.cerebras.ai/v1`
pub fn cerebras_defaults() -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "cerebras".into(),
        base_url: "https://api.cerebras.ai/v1".into(),
        timeout: Duration::from_secs(60),
    }
}

impl From<&LlmConfig> for OpenAiCompatConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            ..cerebras_defaults()
        }
    }
}
