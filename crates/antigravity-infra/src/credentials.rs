//! Startup credential loading.
//!
//! Keys come from `ANTIGRAVITY_API_KEYS` (comma separated) when it is set and
//! non-empty, otherwise from the credentials file:
//!
//! ```json
//! { "cerebras_api_keys": ["csk-...", "csk-..."] }
//! ```
//!
//! Nothing found is not an error: the pool starts empty and replies are
//! refused until keys are configured.

use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

/// Environment variable holding comma-separated API keys.
pub const API_KEYS_ENV: &str = "ANTIGRAVITY_API_KEYS";

#[derive(Debug, Default, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    cerebras_api_keys: Vec<String>,
}

/// Load the ordered credential list.
///
/// `env_value` is the raw value of [`API_KEYS_ENV`], if set.
pub async fn load_credentials(path: &Path, env_value: Option<String>) -> Vec<SecretString> {
    if let Some(raw) = env_value {
        let keys = split_keys(raw.split(','));
        if !keys.is_empty() {
            tracing::info!(count = keys.len(), source = API_KEYS_ENV, "loaded API credentials");
            return keys;
        }
    }

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("No credentials file at {}, starting without API keys", path.display());
            return Vec::new();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, starting without API keys", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str::<CredentialsFile>(&content) {
        Ok(file) => {
            let keys = split_keys(file.cerebras_api_keys.iter().map(String::as_str));
            if keys.is_empty() {
                tracing::warn!("{} lists no API keys", path.display());
            } else {
                tracing::info!(count = keys.len(), source = %path.display(), "loaded API credentials");
            }
            keys
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, starting without API keys", path.display());
            Vec::new()
        }
    }
}

fn split_keys<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<SecretString> {
    raw.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| SecretString::from(k.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn exposed(keys: &[SecretString]) -> Vec<String> {
        keys.iter().map(|k| k.expose_secret().to_string()).collect()
    }

    #[tokio::test]
    async fn env_value_takes_priority() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("api_keys.json");
        tokio::fs::write(&path, r#"{"cerebras_api_keys":["file-key"]}"#)
            .await
            .unwrap();

        let keys = load_credentials(&path, Some(" k1, ,k2 ".into())).await;
        assert_eq!(exposed(&keys), vec!["k1", "k2"]);
    }

    #[tokio::test]
    async fn blank_env_falls_back_to_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("api_keys.json");
        tokio::fs::write(&path, r#"{"cerebras_api_keys":["a","b",""]}"#)
            .await
            .unwrap();

        let keys = load_credentials(&path, Some("  ".into())).await;
        assert_eq!(exposed(&keys), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn missing_or_malformed_file_yields_empty_pool() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("api_keys.json");
        assert!(load_credentials(&path, None).await.is_empty());

        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(load_credentials(&path, None).await.is_empty());

        tokio::fs::write(&path, "{}").await.unwrap();
        assert!(load_credentials(&path, None).await.is_empty());
    }
}
