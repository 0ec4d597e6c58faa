//! Persona endpoint handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use antigravity_types::error::ChatError;
use antigravity_types::persona::PersonaSummary;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PersonaListing {
    pub active: String,
    pub personas: Vec<PersonaSummary>,
}

/// Request body for switching the active persona.
#[derive(Debug, Deserialize)]
pub struct SwitchPersonaRequest {
    pub persona_id: String,
}

/// GET /api/v1/personas - List available personas and the active id.
pub async fn list_personas(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Json<ApiResponse<PersonaListing>> {
    let start = Instant::now();
    let personas = state.orchestrator.list_personas().await;
    let active = state.orchestrator.personas().active_id();
    let elapsed = start.elapsed().as_millis() as u64;

    Json(
        ApiResponse::success(PersonaListing { active, personas }, elapsed)
            .with_link("self", "/api/v1/personas")
            .with_link("switch", "/api/v1/personas/active"),
    )
}

/// POST /api/v1/personas/active - Switch the active persona.
///
/// The token holder acts as the configured administrator; with no
/// `admin_user_id` configured nobody may switch.
pub async fn switch_persona(
    State(state): State<AppState>,
    _auth: Authenticated,
    Json(req): Json<SwitchPersonaRequest>,
) -> Result<Json<ApiResponse<PersonaSummary>>, AppError> {
    let start = Instant::now();

    if req.persona_id.trim().is_empty() {
        return Err(AppError::Validation("persona_id must not be empty".to_string()));
    }
    let Some(admin) = state.config.admin_user_id.as_deref() else {
        return Err(AppError::Chat(ChatError::Unauthorized));
    };

    let summary = state
        .orchestrator
        .switch_persona(admin, req.persona_id.trim())
        .await?;

    tracing::info!(persona = %summary.id, "active persona switched over HTTP");

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(summary, elapsed).with_link("personas", "/api/v1/personas"),
    ))
}
