//! Filter payload parsing
//!
//! Boundary between the host's JSON tool arguments and the typed filter
//! pipeline. Everything suspect is rejected here, before compilation or
//! evaluation runs.

use tracing::warn;

use super::types::FilterCriterion;
use crate::data::error::QueryError;
use crate::data::schema::BrSchema;

/// Maximum size of filter JSON in bytes (64KB)
const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of criteria per filter set
const MAX_FILTERS: usize = 50;

/// Parse a filter set from a JSON payload
///
/// Validates payload size, deserializes into criteria, and validates each
/// criterion (column allow-listed, value compatible with the operator and the
/// column's declared kind).
pub fn parse_filters(json_str: &str, schema: &BrSchema) -> Result<Vec<FilterCriterion>, QueryError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(QueryError::InvalidFilter(format!(
            "filter JSON exceeds maximum size of {MAX_FILTER_JSON_SIZE} bytes"
        )));
    }

    let filters: Vec<FilterCriterion> = serde_json::from_str(json_str).map_err(|e| {
        warn!(error = %e, "rejected malformed filter payload");
        QueryError::InvalidFilter(e.to_string())
    })?;

    if filters.len() > MAX_FILTERS {
        return Err(QueryError::InvalidFilter(format!(
            "maximum {MAX_FILTERS} filters allowed"
        )));
    }

    for filter in &filters {
        filter.validate(schema)?;
    }

    Ok(filters)
}
