//! Runtime configuration types.
//!
//! `AppConfig` mirrors `antigravity.toml`. All fields have defaults, so an
//! empty or missing file yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::DEFAULT_MODEL;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the key-value namespace files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory of persona documents. Defaults to `{data_dir}/profiles`.
    #[serde(default)]
    pub profiles_dir: Option<PathBuf>,

    /// Credentials file, relative to the working directory. Defaults to
    /// `api_keys.json`.
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,

    /// The single user id allowed to switch personas.
    #[serde(default)]
    pub admin_user_id: Option<String>,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Credentials file used when none is configured.
pub const DEFAULT_CREDENTIALS_FILE: &str = "api_keys.json";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profiles_dir: None,
            credentials_file: None,
            admin_user_id: None,
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn profiles_dir(&self) -> PathBuf {
        self.profiles_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("profiles"))
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.credentials_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
    }
}

/// Completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-call timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum completion calls in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_base_url() -> String {
    "https://api.cerebras.ai/v1".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_concurrent() -> usize {
    4
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

/// HTTP server settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Token required on `/api/v1/*`. Without one the JSON API refuses every
    /// request and only the keep-alive routes answer.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.profiles_dir(), PathBuf::from("data/profiles"));
        assert_eq!(config.credentials_file(), PathBuf::from("api_keys.json"));
        assert!(config.server.api_token.is_none());
        assert_eq!(config.llm.model, "qwen-3-32b");
        assert_eq!(config.llm.max_concurrent, 4);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
data_dir = "/srv/bot"
admin_user_id = "7509896689"

[llm]
timeout_secs = 15
"#,
        )
        .unwrap();
        assert_eq!(config.profiles_dir(), PathBuf::from("/srv/bot/profiles"));
        assert_eq!(config.admin_user_id.as_deref(), Some("7509896689"));
        assert_eq!(config.llm.timeout_secs, 15);
        assert_eq!(config.llm.base_url, "https://api.cerebras.ai/v1");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn credentials_file_is_independent_of_data_dir() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/bot"),
            ..AppConfig::default()
        };
        assert_eq!(config.credentials_file(), PathBuf::from("api_keys.json"));

        let config = AppConfig {
            credentials_file: Some(PathBuf::from("secrets/keys.json")),
            ..config
        };
        assert_eq!(config.credentials_file(), PathBuf::from("secrets/keys.json"));
    }

    #[test]
    fn api_token_is_redacted_in_debug() {
        let config: ServerConfig = toml::from_str(r#"api_token = "s3cret""#).unwrap();
        assert_eq!(config.api_token.as_deref(), Some("s3cret"));
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
