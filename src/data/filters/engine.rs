//! Stage-2 in-memory filtering
//!
//! Re-applies an independently supplied filter set to rows already fetched
//! from the store. Runs entirely in memory through the same operator registry
//! and normalizer as the stage-1 compiler.

use super::types::FilterCriterion;
use crate::data::error::QueryError;
use crate::data::schema::{BrSchema, ColumnDef};
use crate::data::types::Row;

/// Keep the rows for which every criterion evaluates true
///
/// Every criterion is validated against the schema before any row is
/// examined, so an unknown column or incompatible value fails the whole call
/// with no partial result. A schema-known column that is simply absent from a
/// row fails that row, not the call. Surviving rows keep their input order.
pub fn apply_filters(
    rows: Vec<Row>,
    filters: &[FilterCriterion],
    schema: &BrSchema,
) -> Result<Vec<Row>, QueryError> {
    if filters.is_empty() {
        return Ok(rows);
    }
    let mut defs = Vec::with_capacity(filters.len());
    for criterion in filters {
        defs.push(criterion.validate(schema)?);
    }
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if row_matches(&row, filters, &defs)? {
            kept.push(row);
        }
    }
    Ok(kept)
}

fn row_matches(
    row: &Row,
    filters: &[FilterCriterion],
    defs: &[&ColumnDef],
) -> Result<bool, QueryError> {
    for (criterion, def) in filters.iter().zip(defs) {
        let Some(value) = row.get(def.name) else {
            return Ok(false);
        };
        if !criterion.operator.evaluate(def, value, &criterion.value)? {
            return Ok(false);
        }
    }
    Ok(true)
}
