//! Postgres adapter: connection pooling, schema introspection, and raw
//! execution.
//!
//! Schema metadata is read live from `information_schema` on every call;
//! nothing is cached here. `run` executes whatever statement it is handed -
//! deployments should grant the connecting role read-only privileges.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use dbqa_core::SqlBackend;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row, TypeInfo};

use super::error::{DatabaseError, DbResult};
use super::render;
use crate::config::DatabaseConfig;

/// Number of sample rows appended to each table's schema description.
const SAMPLE_ROWS: i64 = 3;

/// Postgres database handle.
#[derive(Clone)]
pub struct SqlDatabase {
    pool: PgPool,
}

impl SqlDatabase {
    /// Open a connection pool using the given parameters and verify it with
    /// a round trip.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.url())
            .await?;

        let db = Self { pool };
        db.health_check().await?;
        Ok(db)
    }

    /// Build an adapter around an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check by running a simple query.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Names of the user tables in the public schema.
    pub async fn table_names(&self) -> DbResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(Into::into))
            .collect()
    }

    /// `CREATE TABLE`-style description of the given tables (all tables
    /// when `tables` is `None`), each followed by a few sample rows.
    pub async fn table_info(&self, tables: Option<&[String]>) -> DbResult<String> {
        let names = match tables {
            Some(names) => names.to_vec(),
            None => self.table_names().await?,
        };

        let mut sections = Vec::with_capacity(names.len());
        for table in &names {
            let mut section = self.table_definition(table).await?;
            // Sample rows are best-effort; permission errors on one table
            // must not sink the whole schema description.
            if let Ok(sample) = self.sample_rows(table).await {
                section.push_str(&format!(
                    "\n\n/*\n{} rows from {} table:\n{}\n*/",
                    SAMPLE_ROWS, table, sample
                ));
            }
            sections.push(section);
        }

        Ok(sections.join("\n\n"))
    }

    /// Execute a SQL statement and render its result.
    pub async fn run(&self, sql: &str) -> DbResult<String> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let decoded = rows
            .iter()
            .map(decode_row)
            .collect::<DbResult<Vec<Vec<String>>>>()?;

        Ok(render::format_rows(&decoded))
    }

    async fn table_definition(&self, table: &str) -> DbResult<String> {
        let rows = sqlx::query(
            "SELECT column_name, data_type, is_nullable \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(DatabaseError::not_found(format!("table not found: {}", table)));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.try_get("column_name")?;
            let data_type: String = row.try_get("data_type")?;
            let nullable: String = row.try_get("is_nullable")?;

            let mut line = format!("\t{} {}", name, data_type);
            if nullable == "NO" {
                line.push_str(" NOT NULL");
            }
            columns.push(line);
        }

        Ok(format!("CREATE TABLE {} (\n{}\n)", table, columns.join(",\n")))
    }

    async fn sample_rows(&self, table: &str) -> DbResult<String> {
        let statement = format!(
            "SELECT * FROM \"{}\" LIMIT {}",
            table.replace('"', "\"\""),
            SAMPLE_ROWS
        );
        let rows = sqlx::query(&statement).fetch_all(&self.pool).await?;

        let columns: Vec<String> = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect(),
            None => return Ok(String::new()),
        };
        let decoded = rows
            .iter()
            .map(decode_row)
            .collect::<DbResult<Vec<Vec<String>>>>()?;

        Ok(render::format_table(&columns, &decoded))
    }
}

#[async_trait]
impl SqlBackend for SqlDatabase {
    fn dialect(&self) -> &str {
        "postgresql"
    }

    async fn table_names(&self) -> dbqa_core::Result<Vec<String>> {
        Ok(SqlDatabase::table_names(self).await?)
    }

    async fn table_info(&self, tables: Option<&[String]>) -> dbqa_core::Result<String> {
        Ok(SqlDatabase::table_info(self, tables).await?)
    }

    async fn run(&self, sql: &str) -> dbqa_core::Result<String> {
        Ok(SqlDatabase::run(self, sql).await?)
    }
}

fn decode_row(row: &PgRow) -> DbResult<Vec<String>> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(index, column)| decode_value(row, index, column.type_info().name()))
        .collect()
}

/// Decode one column to its text form. Text-like values are quoted, NULL
/// renders as `NULL`, and types without a decoder render as a placeholder
/// rather than failing the whole result.
fn decode_value(row: &PgRow, index: usize, type_name: &str) -> DbResult<String> {
    let rendered = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(index)?.map(|v| v.to_string()),
        "INT4" => row.try_get::<Option<i32>, _>(index)?.map(|v| v.to_string()),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(|v| v.to_string()),
        "FLOAT4" => row.try_get::<Option<f32>, _>(index)?.map(|v| v.to_string()),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(|v| v.to_string()),
        "NUMERIC" => row
            .try_get::<Option<rust_decimal::Decimal>, _>(index)?
            .map(|v| v.to_string()),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)?
            .map(|v| v.to_string()),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)?
            .map(|v| render::quote_text(&v)),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)?
            .map(|v| render::quote_text(&v.to_string())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|v| render::quote_text(&v.to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|v| render::quote_text(&v.to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|v| render::quote_text(&v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|v| render::quote_text(&v.to_rfc3339())),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(index)?
            .map(|v| render::quote_text(&v.to_string())),
        other => Some(format!("<{}>", other.to_lowercase())),
    };

    Ok(rendered.unwrap_or_else(|| "NULL".to_string()))
}
