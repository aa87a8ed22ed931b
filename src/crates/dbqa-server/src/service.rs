//! Service assembly: configuration in, a ready question-answering service
//! out.
//!
//! `QaService` is constructed once at startup and handed to the request
//! handlers behind an `Arc` - there is no global state. Construction fails
//! fast: a bad credential, an unreachable database, or an unknown provider
//! stops the process before it starts serving.

use std::sync::Arc;

use anyhow::Context;
use dbqa_core::{
    ChatModel, Checkpoint, CheckpointStore, InMemoryCheckpointStore, PipelineOptions, QaPipeline,
    RunOutcome, SqlBackend,
};
use dbqa_llm::ProviderConfig;

use crate::config::AppConfig;
use crate::db::SqlDatabase;

/// The assembled question-answering service shared by all request handlers.
pub struct QaService {
    pipeline: QaPipeline,
    backend: Arc<dyn SqlBackend>,
    default_human_approval: bool,
}

impl QaService {
    /// Build the service from configuration: connect to Postgres, build the
    /// provider client, and wire both into the pipeline.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let database = SqlDatabase::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        tracing::info!(
            host = %config.database.host,
            database = %config.database.name,
            "connected to postgresql database"
        );

        let tables = database.table_names().await?;
        tracing::info!(?tables, "available tables");

        let base_url = dbqa_llm::default_base_url(&config.model.provider)
            .with_context(|| format!("unsupported LLM provider: {}", config.model.provider))?;
        let provider_config =
            ProviderConfig::new(&config.model.api_key, base_url, &config.model.model);
        let model = dbqa_llm::build_model(&config.model.provider, provider_config)?;
        tracing::info!(
            provider = %config.model.provider,
            model = %config.model.model,
            "initialized language model"
        );

        Ok(Self::assemble(
            model,
            Arc::new(database),
            Arc::new(InMemoryCheckpointStore::new()),
            PipelineOptions {
                max_result_rows: config.max_query_results,
                auto_approve: config.auto_approve,
            },
            config.human_intervention,
        ))
    }

    /// Assemble the service from already-built capabilities. This is the
    /// seam tests use to substitute stubs.
    pub fn assemble(
        model: Arc<dyn ChatModel>,
        backend: Arc<dyn SqlBackend>,
        checkpoints: Arc<dyn CheckpointStore>,
        options: PipelineOptions,
        default_human_approval: bool,
    ) -> Self {
        let pipeline = QaPipeline::new(model, backend.clone(), checkpoints, options);
        Self {
            pipeline,
            backend,
            default_human_approval,
        }
    }

    /// Answer a question. An unset approval flag falls back to the
    /// configured default.
    pub async fn ask(
        &self,
        question: &str,
        use_human_approval: Option<bool>,
        conversation_id: Option<&str>,
    ) -> dbqa_core::Result<RunOutcome> {
        let gated = use_human_approval.unwrap_or(self.default_human_approval);
        self.pipeline.ask(question, gated, conversation_id).await
    }

    /// Approve or deny a pending query.
    pub async fn resume(&self, thread_id: &str, approve: bool) -> dbqa_core::Result<RunOutcome> {
        self.pipeline.resume(thread_id, approve).await
    }

    /// Checkpoints currently waiting on a reviewer.
    pub async fn pending_approvals(&self) -> dbqa_core::Result<Vec<Checkpoint>> {
        self.pipeline.pending_approvals().await
    }

    /// Names of the queryable tables.
    pub async fn available_tables(&self) -> dbqa_core::Result<Vec<String>> {
        self.backend.table_names().await
    }

    /// Schema text for one table, or `None` when the table is not among the
    /// queryable tables.
    pub async fn table_schema(&self, table: &str) -> dbqa_core::Result<Option<String>> {
        let tables = self.backend.table_names().await?;
        if !tables.iter().any(|name| name == table) {
            return Ok(None);
        }

        let schema = self
            .backend
            .table_info(Some(&[table.to_string()]))
            .await?;
        Ok(Some(schema))
    }
}
