//! Status endpoint handler.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use antigravity_core::chat::orchestrator::OrchestratorStatus;

use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/status - Provider, credential and persona summary.
pub async fn get_status(
    State(state): State<AppState>,
    _auth: Authenticated,
) -> Json<ApiResponse<OrchestratorStatus>> {
    let start = Instant::now();
    let status = state.orchestrator.status();
    let elapsed = start.elapsed().as_millis() as u64;

    Json(ApiResponse::success(status, elapsed).with_link("self", "/api/v1/status"))
}
