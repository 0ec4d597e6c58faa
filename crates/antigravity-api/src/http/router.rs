//! Axum router configuration with middleware.
//!
//! Keep-alive routes live at the root; the JSON API is under `/api/v1/`.
//! Every `/api/v1/` handler takes the `Authenticated` extractor.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/status", get(handlers::status::get_status))
        .route("/personas", get(handlers::persona::list_personas))
        .route("/personas/active", post(handlers::persona::switch_persona))
        .route("/chat", post(handlers::chat::send_message))
        .route("/history/{user_id}", get(handlers::chat::get_history));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/", get(root))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - Plain-text liveness banner for uptime pingers.
async fn root() -> &'static str {
    "Antigravity bot is running"
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "bot": "running",
    }))
}
