//! Checkpoint storage for the approval-gated pipeline path.
//!
//! A checkpoint is a snapshot of pipeline state taken immediately before the
//! execution step, keyed by a thread id. Resuming consumes the entry, so a
//! checkpoint is resumable at most once. Storage is process-local with no
//! eviction; entries live until resumed or cleared.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::state::PipelineState;

/// Snapshot of pipeline state pending human approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Conversation thread this snapshot belongs to.
    pub thread_id: String,
    /// State at the pause point; `query` is populated, `result` and
    /// `answer` are not.
    pub state: PipelineState,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(thread_id: impl Into<String>, state: PipelineState) -> Self {
        Self {
            thread_id: thread_id.into(),
            state,
            created_at: Utc::now(),
        }
    }
}

/// Derive a stable thread id from question text.
///
/// Identical question text collides by construction; callers that need
/// distinct turns should supply their own conversation id instead of relying
/// on this fallback.
pub fn thread_id_for_question(question: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, question.as_bytes()).to_string()
}

/// Storage backend for pending checkpoints.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Store a checkpoint, replacing any existing entry for the thread.
    async fn put(&self, checkpoint: Checkpoint) -> Result<()>;

    /// Look up a checkpoint without consuming it.
    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>>;

    /// Remove and return the checkpoint, making resume at-most-once.
    async fn take(&self, thread_id: &str) -> Result<Option<Checkpoint>>;

    /// All pending checkpoints, oldest first.
    async fn list(&self) -> Result<Vec<Checkpoint>>;

    /// Drop every pending checkpoint.
    async fn clear(&self) -> Result<()>;
}

/// Thread-safe in-memory checkpoint store.
///
/// Suitable for a single-process deployment; data is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckpointStore {
    storage: Arc<RwLock<HashMap<String, Checkpoint>>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending checkpoints.
    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn put(&self, checkpoint: Checkpoint) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(checkpoint.thread_id.clone(), checkpoint);
        Ok(())
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>> {
        Ok(self.storage.read().await.get(thread_id).cloned())
    }

    async fn take(&self, thread_id: &str) -> Result<Option<Checkpoint>> {
        Ok(self.storage.write().await.remove(thread_id))
    }

    async fn list(&self) -> Result<Vec<Checkpoint>> {
        let storage = self.storage.read().await;
        let mut entries: Vec<Checkpoint> = storage.values().cloned().collect();
        entries.sort_by_key(|entry| entry.created_at);
        Ok(entries)
    }

    async fn clear(&self) -> Result<()> {
        self.storage.write().await.clear();
        Ok(())
    }
}
