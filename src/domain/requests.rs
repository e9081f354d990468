//! Business request search facade
//!
//! The two operations the host (tool/protocol layer) calls. Stateless across
//! calls: each invocation is a pure function of its arguments, the immutable
//! schema, and whatever the executor returns.

use std::sync::Arc;

use tracing::debug;

use crate::data::error::QueryError;
use crate::data::executor::QueryExecutor;
use crate::data::filters::{FilterCriterion, SqlParams, apply_filters, build_where_clause};
use crate::data::schema::BrSchema;
use crate::data::types::Row;

/// Two-stage search over business request records
pub struct BrSearchService {
    executor: Arc<dyn QueryExecutor>,
    schema: Arc<BrSchema>,
}

impl BrSearchService {
    pub fn new(executor: Arc<dyn QueryExecutor>, schema: Arc<BrSchema>) -> Self {
        Self { executor, schema }
    }

    pub fn schema(&self) -> &BrSchema {
        &self.schema
    }

    /// Stage 1: compile the filter set and run it against the store
    ///
    /// Executor failures surface unchanged; cancellation from the host
    /// propagates by dropping the returned future.
    pub async fn search(&self, filters: &[FilterCriterion]) -> Result<Vec<Row>, QueryError> {
        let mut params = SqlParams::default();
        let predicate = build_where_clause(filters, &self.schema, &mut params)?;
        debug!(%predicate, bind_count = params.values.len(), "compiled stage-1 predicate");

        let rows = self
            .executor
            .execute_query(&predicate, &params.values)
            .await?;
        debug!(rows = rows.len(), "stage-1 search returned");
        Ok(rows)
    }

    /// Stage 2: narrow already-fetched rows in memory
    pub fn filter(
        &self,
        rows: Vec<Row>,
        filters: &[FilterCriterion],
    ) -> Result<Vec<Row>, QueryError> {
        apply_filters(rows, filters, &self.schema)
    }
}
