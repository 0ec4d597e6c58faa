//! Chat endpoint handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use antigravity_types::conversation::ConversationEntry;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for sending a chat message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub user_id: String,
    pub reply: String,
}

/// POST /api/v1/chat - Generate a reply for one user message.
pub async fn send_message(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let start = Instant::now();

    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::Validation("user_id must not be empty".to_string()));
    }
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let reply = state.orchestrator.generate_reply(user_id, &req.message).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let history_link = format!("/api/v1/history/{user_id}");
    let resp = ApiResponse::success(
        ChatReply {
            user_id: user_id.to_string(),
            reply,
        },
        elapsed,
    )
    .with_link("self", "/api/v1/chat")
    .with_link("history", &history_link);

    Ok(Json(resp))
}

/// GET /api/v1/history/{user_id} - Stored conversation window for a user.
pub async fn get_history(
    State(state): State<AppState>,
    _auth: Authenticated,
    Path(user_id): Path<String>,
) -> Json<ApiResponse<Vec<ConversationEntry>>> {
    let start = Instant::now();
    let history = state.orchestrator.history(&user_id).await;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/history/{user_id}");
    Json(ApiResponse::success(history, elapsed).with_link("self", &self_link))
}
