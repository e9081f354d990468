//! Error types for the search pipeline
//!
//! `DataError` covers the executor layer (the store collaborator);
//! `QueryError` covers filter compilation and evaluation. Executor failures
//! pass through `QueryError::Execution` unchanged so the host sees the
//! collaborator's error, not a reinterpretation of it.

use thiserror::Error;

/// Errors raised by the query executor layer
#[derive(Error, Debug)]
pub enum DataError {
    /// Store-level failure, surfaced unchanged
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Statement exceeded the executor's timeout
    #[error("query timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Executor misconfiguration
    #[error("configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Create a timeout error
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }
}

/// Errors raised while compiling or evaluating a filter set
///
/// Every variant is fatal for the whole call: ambiguous input is rejected,
/// never downgraded to a non-match.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Column is not in the schema allow-list
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Operator name is not in the registry
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Value cannot be coerced for the column/operator combination
    #[error("type mismatch on column {column}: {detail}")]
    TypeMismatch { column: String, detail: String },

    /// Malformed filter payload rejected at the boundary
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Collaborator failure passed through unchanged
    #[error(transparent)]
    Execution(#[from] DataError),
}

impl QueryError {
    /// Create a type mismatch error for a column
    pub fn type_mismatch(column: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            detail: detail.into(),
        }
    }
}
