//! Request/response models for the HTTP façade.
//!
//! These mirror the wire contract exactly; handlers add no fields beyond
//! what is listed here.

use chrono::{DateTime, Utc};
use dbqa_core::{Checkpoint, RunOutcome};
use serde::{Deserialize, Serialize};

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// The natural-language question.
    pub question: String,
    /// Override the configured default approval behavior.
    #[serde(default)]
    pub use_human_approval: Option<bool>,
    /// Caller-supplied key for the approval checkpoint. Without it the key
    /// is derived from the question text.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response of `POST /ask` and `POST /approvals/{conversation_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
    pub query: String,
    pub result: String,
    pub answer: String,
    pub status: String,
}

impl From<RunOutcome> for QuestionResponse {
    fn from(outcome: RunOutcome) -> Self {
        Self {
            question: outcome.state.question,
            query: outcome.state.query,
            result: outcome.state.result,
            answer: outcome.state.answer,
            status: outcome.status.to_string(),
        }
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database_connected: bool,
    pub available_tables: Vec<String>,
}

impl HealthResponse {
    pub fn healthy(tables: Vec<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            database_connected: true,
            available_tables: tables,
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            database_connected: false,
            available_tables: Vec::new(),
        }
    }
}

/// Response of `GET /tables`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

/// Response of `GET /schema/{table_name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub table: String,
    pub schema: String,
}

/// Body of `POST /approvals/{conversation_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approve: bool,
}

/// One pending checkpoint in `GET /approvals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingApproval {
    pub conversation_id: String,
    pub question: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

impl From<Checkpoint> for PendingApproval {
    fn from(checkpoint: Checkpoint) -> Self {
        Self {
            conversation_id: checkpoint.thread_id,
            question: checkpoint.state.question,
            query: checkpoint.state.query,
            created_at: checkpoint.created_at,
        }
    }
}

/// Response of `GET /approvals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingApprovalsResponse {
    pub pending: Vec<PendingApproval>,
}
