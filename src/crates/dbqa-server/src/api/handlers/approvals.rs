//! Approval review handlers.
//!
//! Gated runs park a checkpoint after query generation. These endpoints let
//! a reviewer list what is pending and submit an approve/deny decision,
//! which resumes (or discards) the paused run.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::ApiResult;
use crate::api::models::{
    ApprovalDecision, PendingApproval, PendingApprovalsResponse, QuestionResponse,
};
use crate::api::routes::AppState;

/// Handler for `GET /approvals`.
pub async fn list_approvals(
    State(state): State<AppState>,
) -> ApiResult<Json<PendingApprovalsResponse>> {
    let pending = state
        .service
        .pending_approvals()
        .await?
        .into_iter()
        .map(PendingApproval::from)
        .collect();

    Ok(Json(PendingApprovalsResponse { pending }))
}

/// Handler for `POST /approvals/{conversation_id}`.
///
/// Consumes the checkpoint: 404 when nothing is pending under the id,
/// including after a prior decision.
pub async fn decide_approval(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(decision): Json<ApprovalDecision>,
) -> ApiResult<Json<QuestionResponse>> {
    tracing::info!(
        conversation_id = %conversation_id,
        approve = decision.approve,
        "approval decision received"
    );
    let outcome = state
        .service
        .resume(&conversation_id, decision.approve)
        .await?;

    Ok(Json(QuestionResponse::from(outcome)))
}
