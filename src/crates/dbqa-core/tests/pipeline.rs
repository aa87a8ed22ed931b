use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbqa_core::{
    thread_id_for_question, ChatModel, InMemoryCheckpointStore, PipelineOptions, QaError,
    QaPipeline, RunStatus, SqlBackend, APPROVAL_DENIED_ANSWER, APPROVAL_PENDING_ANSWER,
};
use serde_json::json;

/// Deterministic model stub: fixed query for structured calls, canned answer
/// for free-text calls. Records every prompt it receives.
struct StubModel {
    query: String,
    answer: String,
    fail_generation: bool,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    fn new(query: &str, answer: &str) -> Self {
        Self {
            query: query.to_string(),
            answer: answer.to_string(),
            fail_generation: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail_generation: true,
            ..Self::new("", "")
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn generate(&self, prompt: &str) -> dbqa_core::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        _schema: &serde_json::Value,
    ) -> dbqa_core::Result<serde_json::Value> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_generation {
            return Err(QaError::Model("model unavailable".to_string()));
        }
        Ok(json!({ "query": self.query }))
    }
}

/// Database stub returning a fixed result for every statement.
struct StubBackend {
    result: String,
    executed: Mutex<Vec<String>>,
}

impl StubBackend {
    fn new(result: &str) -> Self {
        Self {
            result: result.to_string(),
            executed: Mutex::new(Vec::new()),
        }
    }

    fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlBackend for StubBackend {
    fn dialect(&self) -> &str {
        "postgresql"
    }

    async fn table_names(&self) -> dbqa_core::Result<Vec<String>> {
        Ok(vec!["orders".to_string()])
    }

    async fn table_info(&self, _tables: Option<&[String]>) -> dbqa_core::Result<String> {
        Ok("CREATE TABLE orders (id integer, amount numeric)".to_string())
    }

    async fn run(&self, sql: &str) -> dbqa_core::Result<String> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(self.result.clone())
    }
}

fn pipeline_with(
    model: Arc<StubModel>,
    backend: Arc<StubBackend>,
    auto_approve: bool,
) -> (QaPipeline, Arc<InMemoryCheckpointStore>) {
    let store = Arc::new(InMemoryCheckpointStore::new());
    let pipeline = QaPipeline::new(
        model,
        backend,
        store.clone(),
        PipelineOptions {
            max_result_rows: 10,
            auto_approve,
        },
    );
    (pipeline, store)
}

#[tokio::test]
async fn direct_mode_populates_all_fields() {
    let model = Arc::new(StubModel::new(
        "SELECT count(*) FROM orders;",
        "There are 42 orders.",
    ));
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, _) = pipeline_with(model, backend, true);

    let outcome = pipeline
        .ask("How many orders are there?", false, None)
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Answered);
    assert_eq!(outcome.state.question, "How many orders are there?");
    assert_eq!(outcome.state.query, "SELECT count(*) FROM orders;");
    assert_eq!(outcome.state.result, "[(42,)]");
    assert_eq!(outcome.state.answer, "There are 42 orders.");
}

#[tokio::test]
async fn generation_failure_fails_whole_run() {
    let model = Arc::new(StubModel::failing());
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, _) = pipeline_with(model, backend.clone(), true);

    let err = pipeline.ask("anything", false, None).await.unwrap_err();

    assert!(matches!(err, QaError::Model(_)));
    // Nothing past the failed step may have run.
    assert!(backend.executed().is_empty());
}

#[tokio::test]
async fn malformed_structured_output_fails_without_default_query() {
    struct BadModel;

    #[async_trait]
    impl ChatModel for BadModel {
        async fn generate(&self, _prompt: &str) -> dbqa_core::Result<String> {
            Ok(String::new())
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            _schema: &serde_json::Value,
        ) -> dbqa_core::Result<serde_json::Value> {
            Ok(json!({ "sql": "SELECT 1" }))
        }
    }

    let backend = Arc::new(StubBackend::new(""));
    let store = Arc::new(InMemoryCheckpointStore::new());
    let pipeline = QaPipeline::new(
        Arc::new(BadModel),
        backend.clone(),
        store,
        PipelineOptions::default(),
    );

    let err = pipeline.ask("anything", false, None).await.unwrap_err();
    assert!(matches!(err, QaError::MalformedOutput(_)));
    assert!(backend.executed().is_empty());
}

#[tokio::test]
async fn approval_with_auto_approve_matches_direct_mode() {
    let question = "How many orders are there?";

    let model = Arc::new(StubModel::new(
        "SELECT count(*) FROM orders;",
        "There are 42 orders.",
    ));
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, _) = pipeline_with(model.clone(), backend.clone(), true);
    let direct = pipeline.ask(question, false, None).await.unwrap();

    let model2 = Arc::new(StubModel::new(
        "SELECT count(*) FROM orders;",
        "There are 42 orders.",
    ));
    let backend2 = Arc::new(StubBackend::new("[(42,)]"));
    let (gated, _) = pipeline_with(model2, backend2, true);
    let approved = gated.ask(question, true, None).await.unwrap();

    assert_eq!(approved.status, RunStatus::Answered);
    assert_eq!(approved.state, direct.state);
}

#[tokio::test]
async fn approval_without_auto_approve_pauses_with_placeholder() {
    let model = Arc::new(StubModel::new("SELECT count(*) FROM orders;", "unused"));
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, store) = pipeline_with(model, backend.clone(), false);

    let outcome = pipeline
        .ask("How many orders are there?", true, None)
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::AwaitingApproval);
    assert_eq!(outcome.state.query, "SELECT count(*) FROM orders;");
    assert_eq!(outcome.state.answer, APPROVAL_PENDING_ANSWER);
    assert!(outcome.state.result.is_empty());
    // Nothing was executed and the checkpoint is still pending.
    assert!(backend.executed().is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn resume_approve_completes_from_checkpoint() {
    let question = "How many orders are there?";
    let model = Arc::new(StubModel::new(
        "SELECT count(*) FROM orders;",
        "There are 42 orders.",
    ));
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, store) = pipeline_with(model, backend, false);

    pipeline.ask(question, true, None).await.unwrap();

    let thread_id = thread_id_for_question(question);
    let outcome = pipeline.resume(&thread_id, true).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Answered);
    assert_eq!(outcome.state.result, "[(42,)]");
    assert_eq!(outcome.state.answer, "There are 42 orders.");
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn resume_deny_discards_without_executing() {
    let model = Arc::new(StubModel::new("DROP TABLE orders;", "unused"));
    let backend = Arc::new(StubBackend::new("unused"));
    let (pipeline, store) = pipeline_with(model, backend.clone(), false);

    pipeline
        .ask("delete everything", true, Some("session-9"))
        .await
        .unwrap();

    let outcome = pipeline.resume("session-9", false).await.unwrap();

    assert_eq!(outcome.status, RunStatus::Denied);
    assert_eq!(outcome.state.answer, APPROVAL_DENIED_ANSWER);
    assert!(outcome.state.result.is_empty());
    assert!(backend.executed().is_empty());
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn resume_is_at_most_once() {
    let model = Arc::new(StubModel::new("SELECT 1;", "one"));
    let backend = Arc::new(StubBackend::new("[(1,)]"));
    let (pipeline, _) = pipeline_with(model, backend, false);

    pipeline.ask("q", true, Some("session-1")).await.unwrap();
    pipeline.resume("session-1", true).await.unwrap();

    let err = pipeline.resume("session-1", true).await.unwrap_err();
    assert!(matches!(err, QaError::CheckpointNotFound(_)));
}

#[tokio::test]
async fn caller_supplied_conversation_id_keys_the_checkpoint() {
    let model = Arc::new(StubModel::new("SELECT 1;", "one"));
    let backend = Arc::new(StubBackend::new("[(1,)]"));
    let (pipeline, _) = pipeline_with(model, backend, false);

    pipeline
        .ask("same question", true, Some("conv-a"))
        .await
        .unwrap();
    pipeline
        .ask("same question", true, Some("conv-b"))
        .await
        .unwrap();

    let pending = pipeline.pending_approvals().await.unwrap();
    let mut ids: Vec<&str> = pending.iter().map(|c| c.thread_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["conv-a", "conv-b"]);
}

#[tokio::test]
async fn synthesis_prompt_receives_exact_query_and_result() {
    let model = Arc::new(StubModel::new(
        "SELECT count(*) FROM orders;",
        "There are 42 orders.",
    ));
    let backend = Arc::new(StubBackend::new("[(42,)]"));
    let (pipeline, _) = pipeline_with(model.clone(), backend, true);

    pipeline
        .ask("How many orders are there?", false, None)
        .await
        .unwrap();

    // Two model calls: the structured generation prompt, then synthesis.
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 2);
    let synthesis = &prompts[1];
    assert!(synthesis.contains("Question: How many orders are there?"));
    assert!(synthesis.contains("SQL Query: SELECT count(*) FROM orders;"));
    assert!(synthesis.contains("SQL Result: [(42,)]"));
}
