//! Health check endpoint handler.

use axum::{extract::State, Json};

use crate::api::models::HealthResponse;
use crate::api::routes::AppState;

/// Handler for `GET /health`.
///
/// Never fails: any adapter error degrades the response to `unhealthy`
/// with an empty table list.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.service.available_tables().await {
        Ok(tables) => Json(HealthResponse::healthy(tables)),
        Err(err) => {
            tracing::error!(%err, "health check failed");
            Json(HealthResponse::unhealthy())
        }
    }
}
