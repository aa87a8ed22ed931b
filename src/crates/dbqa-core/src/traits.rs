//! Capability traits decoupling the pipeline from concrete drivers.
//!
//! The pipeline only ever talks to a [`ChatModel`] and a [`SqlBackend`].
//! Production wires in a hosted model client and a live database pool; tests
//! wire in deterministic stubs.

use async_trait::async_trait;

use crate::error::Result;

/// A hosted language model able to complete a prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Free-text completion.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Completion constrained to `schema`. Returns the parsed JSON payload;
    /// a response that is not valid JSON for the schema is an error.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}

/// A live relational database: schema introspection plus raw execution.
///
/// `run` executes whatever statement it is handed. There is no read-only
/// enforcement here; deployments should grant the connecting role read-only
/// privileges.
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// SQL dialect understood by the target database (e.g. "postgresql").
    fn dialect(&self) -> &str;

    /// Names of the queryable tables.
    async fn table_names(&self) -> Result<Vec<String>>;

    /// Schema description text for the given tables, or for every table
    /// when `tables` is `None`.
    async fn table_info(&self, tables: Option<&[String]>) -> Result<String>;

    /// Execute a SQL statement and serialize its result to text.
    async fn run(&self, sql: &str) -> Result<String>;
}
