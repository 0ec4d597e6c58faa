//! Configuration loader for Antigravity.
//!
//! Reads `antigravity.toml` (or the path given on the command line) into
//! [`AppConfig`], falling back to defaults when the file is missing or
//! malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use antigravity_types::config::AppConfig;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "antigravity.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ANTIGRAVITY_CONFIG";
/// Environment variable overriding `data_dir`.
pub const DATA_DIR_ENV: &str = "ANTIGRAVITY_DATA_DIR";
/// Environment variable overriding `admin_user_id`.
pub const ADMIN_ENV: &str = "ANTIGRAVITY_ADMIN_ID";
/// Environment variable overriding the server port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding `server.api_token`.
pub const API_TOKEN_ENV: &str = "ANTIGRAVITY_API_TOKEN";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_app_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are ignored; an unparsable `PORT` is logged and ignored.
pub fn apply_env_overrides(mut config: AppConfig, lookup: impl Fn(&str) -> Option<String>) -> AppConfig {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(dir) = get(DATA_DIR_ENV) {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(admin) = get(ADMIN_ENV) {
        config.admin_user_id = Some(admin.trim().to_string());
    }
    if let Some(token) = get(API_TOKEN_ENV) {
        config.server.api_token = Some(token.trim().to_string());
    }
    if let Some(port) = get(PORT_ENV) {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring {PORT_ENV}={port}: {err}"),
        }
    }
    config
}

/// Resolve the configuration file path: explicit flag, then env, then default.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
