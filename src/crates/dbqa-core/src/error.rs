//! Error types for the question-answering pipeline.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, QaError>;

/// Errors that can occur while answering a question.
#[derive(Debug, Error)]
pub enum QaError {
    /// Language-model call failed.
    #[error("model error: {0}")]
    Model(String),

    /// Database call failed.
    #[error("database error: {0}")]
    Database(String),

    /// The model returned output that does not match the requested schema.
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// No pending checkpoint exists under the given thread id.
    #[error("no pending approval for thread {0}")]
    CheckpointNotFound(String),

    /// Checkpoint storage failure.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QaError {
    /// Whether this error means a requested resource was absent, as opposed
    /// to a step failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QaError::CheckpointNotFound(_))
    }
}
