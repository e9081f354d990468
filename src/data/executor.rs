//! Query executor seam
//!
//! The core hands a compiled predicate and its bound parameters to a
//! [`QueryExecutor`] and gets rows back; everything else about reaching the
//! store (connection handling, statement shape, timeouts, retries) belongs to
//! the executor. [`SqliteExecutor`] is the bundled implementation; hosts with
//! a different store supply their own.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column as _, Row as _, SqlitePool, TypeInfo as _};
use tracing::debug;

use crate::core::config::SearchConfig;
use crate::data::error::DataError;
use crate::data::schema::BrSchema;
use crate::data::types::Row;

/// Executes a compiled stage-1 predicate against the backing store
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run the predicate with its bound parameters and return matching rows
    async fn execute_query(
        &self,
        predicate: &str,
        params: &[String],
    ) -> Result<Vec<Row>, DataError>;
}

/// SQLite-backed executor over the business request reporting view
pub struct SqliteExecutor {
    pool: SqlitePool,
    base_sql: String,
    timeout: Duration,
    max_rows: u32,
}

impl SqliteExecutor {
    pub fn new(pool: SqlitePool, schema: &BrSchema, config: &SearchConfig) -> Self {
        let base_sql = format!("SELECT {} FROM {}", schema.select_clause(), config.br_view);
        Self {
            pool,
            base_sql,
            timeout: Duration::from_secs(config.query_timeout_secs),
            max_rows: config.max_rows,
        }
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute_query(
        &self,
        predicate: &str,
        params: &[String],
    ) -> Result<Vec<Row>, DataError> {
        let sql = format!(
            "{} WHERE {} ORDER BY BR_NMBR DESC LIMIT {}",
            self.base_sql, predicate, self.max_rows
        );
        debug!(%sql, bind_count = params.len(), "executing BR search");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(param.as_str());
        }

        let rows = tokio::time::timeout(self.timeout, query.fetch_all(&self.pool))
            .await
            .map_err(|_| DataError::timeout(self.timeout.as_secs()))??;

        Ok(rows.iter().map(decode_row).collect())
    }
}

/// Decode a SQLite row into the shared `Row` map using the column's declared
/// storage class; anything undecodable becomes null
fn decode_row(row: &SqliteRow) -> Row {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "INTEGER" | "BOOLEAN" => row
                .try_get::<Option<i64>, _>(index)
                .ok()
                .flatten()
                .map(Value::from),
            "REAL" | "NUMERIC" => row
                .try_get::<Option<f64>, _>(index)
                .ok()
                .flatten()
                .map(Value::from),
            _ => row
                .try_get::<Option<String>, _>(index)
                .ok()
                .flatten()
                .map(Value::from),
        };
        out.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    out
}
