use thiserror::Error;

use crate::llm::LlmError;

/// Maximum number of characters of error detail shown to an end user.
pub const USER_DETAIL_LIMIT: usize = 50;

/// Outcomes of a chat operation that surface to the caller.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no credentials available")]
    NoCredentialsAvailable,

    #[error("all credentials exhausted after {attempts} attempt(s)")]
    AllCredentialsExhausted { attempts: usize },

    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error("persona '{0}' not found")]
    PersonaNotFound(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl ChatError {
    /// Short, user-safe rendering for transports.
    ///
    /// The detail is cut at [`USER_DETAIL_LIMIT`] characters so provider
    /// bodies never leak wholesale into a chat window.
    pub fn user_message(&self) -> String {
        let detail: String = self.to_string().chars().take(USER_DETAIL_LIMIT).collect();
        format!("Bot bị lỗi: {detail}")
    }
}

impl From<PersonaError> for ChatError {
    fn from(e: PersonaError) -> Self {
        match e {
            PersonaError::NotFound(id) | PersonaError::Invalid { id, .. } => {
                ChatError::PersonaNotFound(id)
            }
            PersonaError::Unauthorized => ChatError::Unauthorized,
        }
    }
}

/// Errors related to persona lookup and switching.
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("persona '{0}' not found")]
    NotFound(String),

    #[error("persona '{id}' is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("only the administrator may switch personas")]
    Unauthorized,
}

/// Errors from the key-value persistence layer.
///
/// Never fatal to a chat request: callers log and fall back.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid namespace '{0}'")]
    InvalidNamespace(String),
}

/// Errors raised while assembling runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
