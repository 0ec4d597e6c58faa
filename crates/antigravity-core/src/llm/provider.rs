//! LlmProvider trait definition.
//!
//! The credential is passed per call rather than held by the provider, so a
//! single client serves the whole [`CredentialPool`].
//!
//! [`CredentialPool`]: crate::credential::pool::CredentialPool

use antigravity_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use crate::credential::pool::Credential;

/// Trait for completion endpoint backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in antigravity-infra (e.g., `OpenAiCompatibleProvider`).
///
/// Implementations must report failures structurally: authentication
/// rejections as [`LlmError::AuthenticationFailed`], throttling as
/// [`LlmError::RateLimited`].
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "cerebras").
    fn name(&self) -> &str;

    /// Send a completion request authorized by `credential`.
    fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
