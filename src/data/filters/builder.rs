//! Stage-1 predicate compilation
//!
//! Compiles a filter set into a WHERE clause with `?` placeholders plus the
//! ordered bind values. Column names come from the schema allow-list, never
//! from the caller, and every value is bound, so no user input reaches the
//! statement text. Text comparisons wrap the field in `LOWER(TRIM(..))` and
//! bind folded values so the store matches exactly what the in-memory engine
//! matches.

use super::normalize;
use super::types::{FilterCriterion, Operator, ScalarValue, SqlParams};
use crate::data::error::QueryError;
use crate::data::schema::{BrSchema, ColumnDef, ColumnKind};

/// Compile a filter set into a WHERE-clause predicate
///
/// Criteria join with ` AND ` in input order. An empty set compiles to an
/// unconditional match. Fails without producing a partial predicate.
pub fn build_where_clause(
    filters: &[FilterCriterion],
    schema: &BrSchema,
    params: &mut SqlParams,
) -> Result<String, QueryError> {
    if filters.is_empty() {
        return Ok("1=1".to_string());
    }
    let mut conditions = Vec::with_capacity(filters.len());
    for criterion in filters {
        conditions.push(criterion_to_sql(criterion, schema, params)?);
    }
    Ok(conditions.join(" AND "))
}

fn criterion_to_sql(
    criterion: &FilterCriterion,
    schema: &BrSchema,
    params: &mut SqlParams,
) -> Result<String, QueryError> {
    let def = schema
        .column(&criterion.column)
        .ok_or_else(|| QueryError::UnknownColumn(criterion.column.clone()))?;
    match def.kind {
        ColumnKind::Text => text_to_sql(def, criterion, params),
        ColumnKind::Number => number_to_sql(def, criterion, params),
        ColumnKind::Date => date_to_sql(def, criterion, params),
    }
}

fn text_to_sql(
    def: &ColumnDef,
    criterion: &FilterCriterion,
    params: &mut SqlParams,
) -> Result<String, QueryError> {
    let col = format!("LOWER(TRIM({}))", def.field);
    match criterion.operator {
        Operator::Equals => {
            params.push(criterion.value.as_scalar(def.name)?.folded_text());
            Ok(format!("{col} = ?"))
        }
        Operator::NotEquals => {
            params.push(criterion.value.as_scalar(def.name)?.folded_text());
            Ok(format!("{col} <> ?"))
        }
        Operator::GreaterThan => {
            params.push(criterion.value.as_scalar(def.name)?.folded_text());
            Ok(format!("{col} > ?"))
        }
        Operator::LessThan => {
            params.push(criterion.value.as_scalar(def.name)?.folded_text());
            Ok(format!("{col} < ?"))
        }
        Operator::Contains => {
            let needle = like_needle(def, criterion)?;
            params.push(format!("%{needle}%"));
            Ok(format!("{col} LIKE ? ESCAPE '\\'"))
        }
        Operator::StartsWith => {
            let needle = like_needle(def, criterion)?;
            params.push(format!("{needle}%"));
            Ok(format!("{col} LIKE ? ESCAPE '\\'"))
        }
        Operator::EndsWith => {
            let needle = like_needle(def, criterion)?;
            params.push(format!("%{needle}"));
            Ok(format!("{col} LIKE ? ESCAPE '\\'"))
        }
        Operator::In => {
            let items = criterion.value.as_list(def.name)?;
            if items.is_empty() {
                return Ok("1=0".to_string());
            }
            let placeholders: Vec<&str> = items.iter().map(|_| "?").collect();
            for item in items {
                params.push(item.folded_text());
            }
            Ok(format!("{col} IN ({})", placeholders.join(", ")))
        }
    }
}

/// Escaped, folded needle for a LIKE pattern
fn like_needle(def: &ColumnDef, criterion: &FilterCriterion) -> Result<String, QueryError> {
    match criterion.value.as_scalar(def.name)? {
        ScalarValue::Text(s) => Ok(normalize::escape_like(&normalize::fold(s))),
        ScalarValue::Number(_) => Err(QueryError::type_mismatch(
            def.name,
            format!("operator `{}` requires a string value", criterion.operator),
        )),
    }
}

fn number_to_sql(
    def: &ColumnDef,
    criterion: &FilterCriterion,
    params: &mut SqlParams,
) -> Result<String, QueryError> {
    match criterion.operator {
        Operator::Equals | Operator::NotEquals | Operator::GreaterThan | Operator::LessThan => {
            let value = normalize::scalar_number(def.name, criterion.value.as_scalar(def.name)?)?;
            params.push(value.to_string());
            Ok(format!("{} {} ?", def.field, comparator(criterion.operator)))
        }
        Operator::In => {
            let items = criterion.value.as_list(def.name)?;
            if items.is_empty() {
                return Ok("1=0".to_string());
            }
            let placeholders: Vec<&str> = items.iter().map(|_| "?").collect();
            for item in items {
                params.push(normalize::scalar_number(def.name, item)?.to_string());
            }
            Ok(format!("{} IN ({})", def.field, placeholders.join(", ")))
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            Err(QueryError::type_mismatch(
                def.name,
                "substring match requires a text column",
            ))
        }
    }
}

fn date_to_sql(
    def: &ColumnDef,
    criterion: &FilterCriterion,
    params: &mut SqlParams,
) -> Result<String, QueryError> {
    let col = format!("DATE({})", def.field);
    match criterion.operator {
        Operator::Equals | Operator::NotEquals | Operator::GreaterThan | Operator::LessThan => {
            let date = normalize::scalar_date(def.name, criterion.value.as_scalar(def.name)?)?;
            params.push(date.format("%Y-%m-%d").to_string());
            Ok(format!("{col} {} ?", comparator(criterion.operator)))
        }
        Operator::In => {
            let items = criterion.value.as_list(def.name)?;
            if items.is_empty() {
                return Ok("1=0".to_string());
            }
            let placeholders: Vec<&str> = items.iter().map(|_| "?").collect();
            for item in items {
                let date = normalize::scalar_date(def.name, item)?;
                params.push(date.format("%Y-%m-%d").to_string());
            }
            Ok(format!("{col} IN ({})", placeholders.join(", ")))
        }
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            Err(QueryError::type_mismatch(
                def.name,
                "substring match requires a text column",
            ))
        }
    }
}

/// SQL comparator for equality and ordering operators
fn comparator(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "=",
        Operator::NotEquals => "<>",
        Operator::GreaterThan => ">",
        Operator::LessThan => "<",
        // Callers only pass the four operators above
        Operator::Contains
        | Operator::StartsWith
        | Operator::EndsWith
        | Operator::In => "=",
    }
}
