//! Question-answering endpoint handler.

use axum::{extract::State, Json};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{QuestionRequest, QuestionResponse};
use crate::api::routes::AppState;

/// Handler for `POST /ask`.
///
/// Runs the full pipeline. The approval flag falls back to the configured
/// default when the request leaves it unset; any step failure surfaces as
/// a 500.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<Json<QuestionResponse>> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }

    tracing::info!(question = %request.question, "processing question");
    let outcome = state
        .service
        .ask(
            &request.question,
            request.use_human_approval,
            request.conversation_id.as_deref(),
        )
        .await?;

    Ok(Json(QuestionResponse::from(outcome)))
}
