//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use antigravity_types::error::ChatError;

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat orchestration errors.
    Chat(ChatError),
    /// Request validation error.
    Validation(String),
    /// Missing or invalid API token.
    Unauthenticated(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    /// Status code, machine-readable code and message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(e @ ChatError::NoCredentialsAvailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NO_CREDENTIALS", e.to_string())
            }
            AppError::Chat(e @ ChatError::AllCredentialsExhausted { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CREDENTIALS_EXHAUSTED", e.to_string())
            }
            AppError::Chat(e @ ChatError::ModelInvocation(_)) => {
                (StatusCode::BAD_GATEWAY, "MODEL_INVOCATION_ERROR", e.user_message())
            }
            AppError::Chat(ChatError::PersonaNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "PERSONA_NOT_FOUND",
                format!("Persona '{id}' not found"),
            ),
            AppError::Chat(ChatError::Unauthorized) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Only the administrator may switch personas".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::warn!(code, %message, "request failed");
        }
        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antigravity_types::llm::LlmError;

    #[test]
    fn chat_errors_map_to_distinct_statuses() {
        let cases = [
            (AppError::from(ChatError::NoCredentialsAvailable), StatusCode::SERVICE_UNAVAILABLE),
            (
                AppError::from(ChatError::AllCredentialsExhausted { attempts: 2 }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::from(ChatError::ModelInvocation(LlmError::Timeout { after_ms: 10 })),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::from(ChatError::PersonaNotFound("x".into())), StatusCode::NOT_FOUND),
            (AppError::from(ChatError::Unauthorized), StatusCode::FORBIDDEN),
            (AppError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthenticated("no token".into()), StatusCode::UNAUTHORIZED),
        ];
        for (error, expected) in cases {
            assert_eq!(error.parts().0, expected);
        }
    }

    #[test]
    fn model_errors_are_truncated_for_clients() {
        let err = AppError::from(ChatError::ModelInvocation(LlmError::Provider {
            status: Some(500),
            message: "x".repeat(500),
        }));
        let (_, _, message) = err.parts();
        assert!(message.chars().count() < 100);
    }

    #[test]
    fn into_response_sets_status() {
        let response = AppError::from(ChatError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
