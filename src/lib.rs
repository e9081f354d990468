//! Two-stage filtered search over business request (BR) records.
//!
//! Stage 1 compiles a list of column/operator/value criteria into a
//! parameterized SQL predicate that a [`QueryExecutor`] runs against the
//! backing store. Stage 2 re-applies an independent list of criteria to the
//! fetched rows in memory. Both stages share one operator registry and one
//! normalization path, so a criterion filters identically whether it is
//! pushed to the store or applied after the fetch.
//!
//! - `core` - configuration and constants
//! - `data` - schema allow-list, filter compilation and evaluation, executor seam
//! - `domain` - the `search`/`filter` facade exposed to the host

pub mod core;
pub mod data;
pub mod domain;

pub use data::error::{DataError, QueryError};
pub use data::executor::{QueryExecutor, SqliteExecutor};
pub use data::filters::{
    FilterCriterion, FilterValue, Operator, ScalarValue, SqlParams, apply_filters,
    build_where_clause, parse_filters,
};
pub use data::schema::{BrSchema, ColumnDef, ColumnKind};
pub use data::types::Row;
pub use domain::BrSearchService;
