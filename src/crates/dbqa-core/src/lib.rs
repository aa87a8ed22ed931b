//! Core question-answering pipeline for dbqa.
//!
//! This crate implements the three-stage pipeline that turns a natural
//! language question into a grounded answer: generate a SQL query from the
//! question and schema, execute it, then synthesize an answer from the
//! question, query, and result. The pipeline can optionally pause between
//! generation and execution so a human can approve the query before it runs.
//!
//! The pipeline is decoupled from any concrete language model or database
//! driver through two capability traits:
//!
//! - [`ChatModel`] - free-text and schema-constrained completion
//! - [`SqlBackend`] - schema introspection and raw SQL execution
//!
//! Concrete providers live in `dbqa-llm` and `dbqa-server`; tests substitute
//! in-process stubs.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dbqa_core::{InMemoryCheckpointStore, PipelineOptions, QaPipeline};
//!
//! let pipeline = QaPipeline::new(
//!     model,                                   // Arc<dyn ChatModel>
//!     backend,                                 // Arc<dyn SqlBackend>
//!     Arc::new(InMemoryCheckpointStore::new()),
//!     PipelineOptions::default(),
//! );
//!
//! let outcome = pipeline.ask("How many orders shipped last week?", false, None).await?;
//! println!("{}", outcome.state.answer);
//! ```

pub mod checkpoint;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod state;
pub mod traits;

pub use checkpoint::{thread_id_for_question, Checkpoint, CheckpointStore, InMemoryCheckpointStore};
pub use error::{QaError, Result};
pub use pipeline::{PipelineOptions, QaPipeline, APPROVAL_DENIED_ANSWER, APPROVAL_PENDING_ANSWER};
pub use state::{PipelineState, QueryOutput, RunOutcome, RunStatus};
pub use traits::{ChatModel, SqlBackend};
