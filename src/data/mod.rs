//! Data layer: schema allow-list, filter pipeline, and the store seam

pub mod error;
pub mod executor;
pub mod filters;
pub mod schema;
pub mod types;

pub use error::{DataError, QueryError};
pub use executor::{QueryExecutor, SqliteExecutor};
pub use schema::{BrSchema, ColumnDef, ColumnKind};
pub use types::Row;
