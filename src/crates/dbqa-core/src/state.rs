//! Pipeline state shared by the three question-answering steps.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Record threaded through the pipeline.
///
/// Fields are filled left-to-right: `query` by generation, `result` by
/// execution, `answer` by synthesis. A step never touches a field owned by
/// an earlier step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// The user's natural-language question.
    pub question: String,
    /// Generated SQL query.
    pub query: String,
    /// Execution result, serialized to text.
    pub result: String,
    /// Natural-language answer grounded in the result.
    pub answer: String,
}

impl PipelineState {
    /// Create a fresh state holding only the question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }
}

/// How a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// All three steps completed.
    Answered,
    /// Query generated; execution is paused until a reviewer approves it.
    AwaitingApproval,
    /// A reviewer rejected the generated query; it was never executed.
    Denied,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Answered => write!(f, "success"),
            RunStatus::AwaitingApproval => write!(f, "awaiting_approval"),
            RunStatus::Denied => write!(f, "denied"),
        }
    }
}

/// Final state of a run plus its terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub state: PipelineState,
    pub status: RunStatus,
}

/// Structured-output contract for the query-generation step.
///
/// The model is asked to respond with JSON matching [`QueryOutput::schema`];
/// anything else fails the request rather than falling back to a default
/// query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOutput {
    /// Syntactically valid SQL query.
    pub query: String,
}

impl QueryOutput {
    /// JSON schema the model's structured output must match.
    pub fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Syntactically valid SQL query."
                }
            },
            "required": ["query"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_holds_only_question() {
        let state = PipelineState::new("How many users are there?");
        assert_eq!(state.question, "How many users are there?");
        assert!(state.query.is_empty());
        assert!(state.result.is_empty());
        assert!(state.answer.is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RunStatus::Answered.to_string(), "success");
        assert_eq!(RunStatus::AwaitingApproval.to_string(), "awaiting_approval");
        assert_eq!(RunStatus::Denied.to_string(), "denied");
    }

    #[test]
    fn test_query_output_schema_requires_query() {
        let schema = QueryOutput::schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"][0], "query");
        assert_eq!(schema["properties"]["query"]["type"], "string");
    }

    #[test]
    fn test_query_output_parses_from_schema_shaped_json() {
        let payload = json!({"query": "SELECT count(*) FROM orders;"});
        let output: QueryOutput = serde_json::from_value(payload).unwrap();
        assert_eq!(output.query, "SELECT count(*) FROM orders;");
    }
}
