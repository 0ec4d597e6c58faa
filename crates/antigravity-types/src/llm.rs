//! Completion request/response types and the provider error taxonomy.
//!
//! Failure classification is structural: [`LlmError::kind`] only looks at the
//! variant, and providers pick the variant from the HTTP status code.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model used when no override is configured.
pub const DEFAULT_MODEL: &str = "qwen-3-32b";

/// Sampling temperature used for every reply.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// Output token cap used for every reply.
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Role of a message sent to the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to a completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Response from a completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Token usage reported by the endpoint, when available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Fixed sampling parameters applied to every reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl GenerationSettings {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Coarse classification of a failed completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Authentication,
    RateLimit,
    Timeout,
    Other,
}

impl FailureKind {
    /// Whether this failure should move the pool to the next credential.
    pub fn rotates_credential(self) -> bool {
        matches!(self, FailureKind::Authentication | FailureKind::RateLimit)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Authentication => write!(f, "authentication"),
            FailureKind::RateLimit => write!(f, "rate_limit"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// Errors from completion providers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("provider error: {message}")]
    Provider { status: Option<u16>, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl LlmError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: String, retry_after_ms: Option<u64>) -> Self {
        match status {
            401 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited { retry_after_ms },
            _ => LlmError::Provider {
                status: Some(status),
                message: format!("HTTP {status}: {body}"),
            },
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            LlmError::AuthenticationFailed => FailureKind::Authentication,
            LlmError::RateLimited { .. } => FailureKind::RateLimit,
            LlmError::Timeout { .. } => FailureKind::Timeout,
            LlmError::Provider { .. } | LlmError::Deserialization(_) => FailureKind::Other,
        }
    }
}
