//! Value normalization shared by both filtering stages
//!
//! Stage 1 binds normalized values into the compiled predicate and stage 2
//! normalizes row values before comparison, so the same criterion selects the
//! same rows whichever stage runs it. Text is trimmed and case-folded,
//! declared-numeric columns coerce to `f64`, declared-date columns parse to
//! `NaiveDate`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::types::ScalarValue;
use crate::data::error::QueryError;

/// Trim and case-fold a string for case-insensitive comparison
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Escape LIKE metacharacters (`%`, `_`, `\`) before pattern interpolation
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Normalized text form of a row value, if it has one
///
/// `None` means the value has no text form (null, array, object) and the
/// criterion fails for that row rather than erroring.
pub fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(fold(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Coerce a row value from a declared-numeric column to `f64`
pub fn number_of(column: &str, value: &Value) -> Result<f64, QueryError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| QueryError::type_mismatch(column, "number is out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| QueryError::type_mismatch(column, format!("cannot interpret {s:?} as a number"))),
        _ => Err(QueryError::type_mismatch(
            column,
            "cannot interpret value as a number",
        )),
    }
}

/// Coerce a row value from a declared-date column to a calendar date
pub fn date_of(column: &str, value: &Value) -> Result<NaiveDate, QueryError> {
    match value {
        Value::String(s) => parse_date(column, s),
        _ => Err(QueryError::type_mismatch(
            column,
            "cannot interpret value as a date",
        )),
    }
}

/// Parse a bare date, an RFC 3339 timestamp, or a `YYYY-MM-DD HH:MM:SS`
/// timestamp down to its calendar date
pub fn parse_date(column: &str, raw: &str) -> Result<NaiveDate, QueryError> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    Err(QueryError::type_mismatch(
        column,
        format!("cannot interpret {trimmed:?} as a date"),
    ))
}

/// Coerce a filter scalar to `f64` for a declared-numeric column
pub fn scalar_number(column: &str, value: &ScalarValue) -> Result<f64, QueryError> {
    match value {
        ScalarValue::Number(n) => Ok(*n),
        ScalarValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| QueryError::type_mismatch(column, format!("cannot interpret {s:?} as a number"))),
    }
}

/// Coerce a filter scalar to a calendar date for a declared-date column
pub fn scalar_date(column: &str, value: &ScalarValue) -> Result<NaiveDate, QueryError> {
    match value {
        ScalarValue::Text(s) => parse_date(column, s),
        ScalarValue::Number(_) => Err(QueryError::type_mismatch(
            column,
            "cannot interpret a number as a date",
        )),
    }
}
