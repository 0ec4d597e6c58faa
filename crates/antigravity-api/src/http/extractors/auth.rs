//! API token authentication extractor.
//!
//! Extracts and verifies the API token from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! Tokens are SHA-256 hashed and compared against the digest of
//! `server.api_token`. With no token configured every request is refused.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated request marker. Extracting this validates the API token.
pub struct Authenticated;

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.api_token_hash.as_deref() else {
            return Err(AppError::Unauthenticated(
                "HTTP API disabled: no server.api_token configured".to_string(),
            ));
        };

        let token = extract_api_token(parts)?;
        if hash_api_token(&token) == expected {
            Ok(Authenticated)
        } else {
            tracing::warn!("rejected request with invalid API token");
            Err(AppError::Unauthenticated("Invalid API token".to_string()))
        }
    }
}

/// Extract the API token from request headers.
fn extract_api_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthenticated("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    if let Some(token) = parts.headers.get("x-api-key") {
        let token_str = token.to_str().map_err(|_| {
            AppError::Unauthenticated("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(token_str.trim().to_string());
    }

    Err(AppError::Unauthenticated(
        "Missing API token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header."
            .to_string(),
    ))
}

/// Compute SHA-256 hash of an API token (lowercase hex).
pub fn hash_api_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest)
}
