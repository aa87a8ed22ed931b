//! The three-stage question-answering pipeline.
//!
//! `start -> generated -> executed -> answered`, with an alternate gated
//! path that pauses at `generated` until a reviewer approves or denies the
//! query. A run either completes every remaining step or fails with the
//! first error; there is no partial success apart from the deliberate
//! awaiting-approval terminal state.

use std::sync::Arc;

use crate::checkpoint::{thread_id_for_question, Checkpoint, CheckpointStore};
use crate::error::{QaError, Result};
use crate::prompts;
use crate::state::{PipelineState, QueryOutput, RunOutcome, RunStatus};
use crate::traits::{ChatModel, SqlBackend};

/// Answer text returned when a gated run pauses for review.
pub const APPROVAL_PENDING_ANSWER: &str =
    "Query generated but requires human approval to execute.";

/// Answer text returned when a reviewer rejects a pending query.
pub const APPROVAL_DENIED_ANSWER: &str =
    "Query was rejected by the reviewer and was not executed.";

/// Tunables for a pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Row-limit hint passed to the model when generating queries.
    pub max_result_rows: usize,
    /// When true, gated runs resume immediately after the checkpoint is
    /// stored instead of waiting for an explicit decision.
    pub auto_approve: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_result_rows: 10,
            auto_approve: true,
        }
    }
}

/// Question-answering pipeline over injected capabilities.
///
/// One instance serves all requests concurrently; the model client, backend,
/// and checkpoint store are shared behind `Arc`s and must be safe for
/// concurrent use (all provided implementations are).
pub struct QaPipeline {
    model: Arc<dyn ChatModel>,
    backend: Arc<dyn SqlBackend>,
    checkpoints: Arc<dyn CheckpointStore>,
    options: PipelineOptions,
}

impl QaPipeline {
    pub fn new(
        model: Arc<dyn ChatModel>,
        backend: Arc<dyn SqlBackend>,
        checkpoints: Arc<dyn CheckpointStore>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            model,
            backend,
            checkpoints,
            options,
        }
    }

    /// Answer a question.
    ///
    /// With `use_human_approval` unset the run goes straight through all
    /// three steps. Gated runs checkpoint after generation under
    /// `conversation_id` (or a thread id derived from the question text when
    /// no id is supplied) and either auto-resume or pause for review.
    pub async fn ask(
        &self,
        question: &str,
        use_human_approval: bool,
        conversation_id: Option<&str>,
    ) -> Result<RunOutcome> {
        if use_human_approval {
            self.ask_with_approval(question, conversation_id).await
        } else {
            self.ask_direct(question).await
        }
    }

    /// Approve or deny a pending query, consuming its checkpoint.
    ///
    /// On approve, execution and synthesis run from the stored state exactly
    /// as they would have in a direct run. On deny, the state is returned
    /// with a denial answer and nothing is executed.
    pub async fn resume(&self, thread_id: &str, approve: bool) -> Result<RunOutcome> {
        let checkpoint = self
            .checkpoints
            .take(thread_id)
            .await?
            .ok_or_else(|| QaError::CheckpointNotFound(thread_id.to_string()))?;

        let mut state = checkpoint.state;
        if !approve {
            tracing::info!(thread_id, "query denied by reviewer");
            state.answer = APPROVAL_DENIED_ANSWER.to_string();
            return Ok(RunOutcome {
                state,
                status: RunStatus::Denied,
            });
        }

        tracing::debug!(thread_id, "resuming from checkpoint");
        state.result = self.execute_query(&state.query).await?;
        state.answer = self.generate_answer(&state).await?;
        Ok(RunOutcome {
            state,
            status: RunStatus::Answered,
        })
    }

    /// Checkpoints currently waiting on a reviewer, oldest first.
    pub async fn pending_approvals(&self) -> Result<Vec<Checkpoint>> {
        self.checkpoints.list().await
    }

    async fn ask_direct(&self, question: &str) -> Result<RunOutcome> {
        let mut state = PipelineState::new(question);
        state.query = self.write_query(&state.question).await?;
        state.result = self.execute_query(&state.query).await?;
        state.answer = self.generate_answer(&state).await?;
        Ok(RunOutcome {
            state,
            status: RunStatus::Answered,
        })
    }

    async fn ask_with_approval(
        &self,
        question: &str,
        conversation_id: Option<&str>,
    ) -> Result<RunOutcome> {
        let thread_id = conversation_id
            .map(str::to_owned)
            .unwrap_or_else(|| thread_id_for_question(question));

        let mut state = PipelineState::new(question);
        state.query = self.write_query(&state.question).await?;

        self.checkpoints
            .put(Checkpoint::new(&thread_id, state.clone()))
            .await?;
        tracing::info!(thread_id = %thread_id, "query generated, awaiting approval");

        if self.options.auto_approve {
            return self.resume(&thread_id, true).await;
        }

        state.answer = APPROVAL_PENDING_ANSWER.to_string();
        Ok(RunOutcome {
            state,
            status: RunStatus::AwaitingApproval,
        })
    }

    /// Generation step: schema-constrained model call producing one SQL
    /// query. A model failure or unparseable payload fails the run; there is
    /// no default query.
    async fn write_query(&self, question: &str) -> Result<String> {
        let table_info = self.backend.table_info(None).await?;
        let prompt = prompts::query_prompt(
            self.backend.dialect(),
            self.options.max_result_rows,
            &table_info,
            question,
        );

        let payload = self
            .model
            .generate_structured(&prompt, &QueryOutput::schema())
            .await?;
        let output: QueryOutput = serde_json::from_value(payload)
            .map_err(|err| QaError::MalformedOutput(err.to_string()))?;

        tracing::debug!(query = %output.query, "generated query");
        Ok(output.query)
    }

    /// Execution step: runs the statement as generated. Driver errors
    /// propagate and fail the run.
    async fn execute_query(&self, query: &str) -> Result<String> {
        self.backend.run(query).await
    }

    /// Synthesis step: free-text model call over question, query, result.
    async fn generate_answer(&self, state: &PipelineState) -> Result<String> {
        let prompt = prompts::answer_prompt(&state.question, &state.query, &state.result);
        self.model.generate(&prompt).await
    }
}
