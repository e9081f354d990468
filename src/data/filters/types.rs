//! Filter criteria and the operator registry
//!
//! One `Operator` registry backs both filtering stages: the stage-1 compiler
//! maps each operator to SQL and the stage-2 engine calls
//! [`Operator::evaluate`], so "filtered at the source" and "filtered after
//! fetch" can never drift apart.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use serde::de::Error as _;
use serde_json::Value;

use super::normalize;
use crate::data::error::QueryError;
use crate::data::schema::{BrSchema, ColumnDef, ColumnKind};

/// Comparison operator usable in either filtering stage
///
/// Canonical names are matched case-sensitively; the symbolic forms `=`,
/// `!=`, `<>`, `>` and `<` are accepted as input aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    In,
}

impl Operator {
    /// Resolve an operator name against the registry
    pub fn parse(name: &str) -> Result<Self, QueryError> {
        match name {
            "equals" | "=" => Ok(Self::Equals),
            "notEquals" | "!=" | "<>" => Ok(Self::NotEquals),
            "contains" => Ok(Self::Contains),
            "startsWith" => Ok(Self::StartsWith),
            "endsWith" => Ok(Self::EndsWith),
            "greaterThan" | ">" => Ok(Self::GreaterThan),
            "lessThan" | "<" => Ok(Self::LessThan),
            "in" => Ok(Self::In),
            _ => Err(QueryError::UnsupportedOperator(name.to_string())),
        }
    }

    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::In => "in",
        }
    }

    /// Evaluate this operator against a row value (stage 2)
    ///
    /// `left` is the row value under `def`'s logical name, `right` the filter
    /// value. A null row value fails the criterion for every operator,
    /// including `notEquals`.
    pub fn evaluate(
        self,
        def: &ColumnDef,
        left: &Value,
        right: &FilterValue,
    ) -> Result<bool, QueryError> {
        if left.is_null() {
            return Ok(false);
        }
        match self {
            Self::Equals => Ok(compare(def, left, right.as_scalar(def.name)?)?
                == Some(Ordering::Equal)),
            Self::NotEquals => Ok(matches!(
                compare(def, left, right.as_scalar(def.name)?)?,
                Some(ord) if ord != Ordering::Equal
            )),
            Self::GreaterThan => Ok(compare(def, left, right.as_scalar(def.name)?)?
                == Some(Ordering::Greater)),
            Self::LessThan => {
                Ok(compare(def, left, right.as_scalar(def.name)?)? == Some(Ordering::Less))
            }
            Self::Contains => Ok(substring_operands(def, left, right)?
                .is_some_and(|(hay, needle)| hay.contains(&needle))),
            Self::StartsWith => Ok(substring_operands(def, left, right)?
                .is_some_and(|(hay, needle)| hay.starts_with(&needle))),
            Self::EndsWith => Ok(substring_operands(def, left, right)?
                .is_some_and(|(hay, needle)| hay.ends_with(&needle))),
            Self::In => {
                for item in right.as_list(def.name)? {
                    if compare(def, left, item)? == Some(Ordering::Equal) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name).map_err(|_| D::Error::custom(format!("unsupported operator: {name}")))
    }
}

/// A single scalar filter operand
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// Normalized text form, for comparisons on text columns
    pub fn folded_text(&self) -> String {
        match self {
            Self::Text(s) => normalize::fold(s),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Filter operand: a scalar for most operators, a list for `in`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
}

impl FilterValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Scalar(ScalarValue::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::Scalar(ScalarValue::Number(n))
    }

    pub fn list<I: IntoIterator<Item = ScalarValue>>(items: I) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub(crate) fn as_scalar(&self, column: &str) -> Result<&ScalarValue, QueryError> {
        match self {
            Self::Scalar(s) => Ok(s),
            Self::List(_) => Err(QueryError::type_mismatch(
                column,
                "expected a single value, got a list",
            )),
        }
    }

    pub(crate) fn as_list(&self, column: &str) -> Result<&[ScalarValue], QueryError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Scalar(_) => Err(QueryError::type_mismatch(
                column,
                "operator `in` requires a list value",
            )),
        }
    }
}

/// One column/operator/value criterion; a filter set is an ordered,
/// AND-combined list of these
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterCriterion {
    pub column: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl FilterCriterion {
    /// Validate this criterion against the schema allow-list
    ///
    /// Checks the column is known and the value's shape and type are
    /// compatible with the operator and the column's declared kind. Returns
    /// the matched column definition.
    pub fn validate<'a>(&self, schema: &'a BrSchema) -> Result<&'a ColumnDef, QueryError> {
        let def = schema
            .column(&self.column)
            .ok_or_else(|| QueryError::UnknownColumn(self.column.clone()))?;
        match self.operator {
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                if def.kind != ColumnKind::Text {
                    return Err(QueryError::type_mismatch(
                        def.name,
                        format!("operator `{}` requires a text column", self.operator),
                    ));
                }
                match self.value.as_scalar(def.name)? {
                    ScalarValue::Text(_) => {}
                    ScalarValue::Number(_) => {
                        return Err(QueryError::type_mismatch(
                            def.name,
                            format!("operator `{}` requires a string value", self.operator),
                        ));
                    }
                }
            }
            Operator::In => {
                for item in self.value.as_list(def.name)? {
                    check_scalar(def, item)?;
                }
            }
            _ => {
                check_scalar(def, self.value.as_scalar(def.name)?)?;
            }
        }
        Ok(def)
    }
}

/// Check a filter scalar coerces under the column's declared kind
fn check_scalar(def: &ColumnDef, value: &ScalarValue) -> Result<(), QueryError> {
    match def.kind {
        ColumnKind::Text => Ok(()),
        ColumnKind::Number => normalize::scalar_number(def.name, value).map(|_| ()),
        ColumnKind::Date => normalize::scalar_date(def.name, value).map(|_| ()),
    }
}

/// Ordering between a row value and a filter scalar under the column's
/// declared kind
///
/// `None` means the row value has no comparable form (the criterion fails for
/// that row); coercion failures are hard errors.
fn compare(
    def: &ColumnDef,
    left: &Value,
    right: &ScalarValue,
) -> Result<Option<Ordering>, QueryError> {
    match def.kind {
        ColumnKind::Text => {
            let Some(l) = normalize::text_of(left) else {
                return Ok(None);
            };
            Ok(Some(l.cmp(&right.folded_text())))
        }
        ColumnKind::Number => {
            let l = normalize::number_of(def.name, left)?;
            let r = normalize::scalar_number(def.name, right)?;
            Ok(l.partial_cmp(&r))
        }
        ColumnKind::Date => {
            let l = normalize::date_of(def.name, left)?;
            let r = normalize::scalar_date(def.name, right)?;
            Ok(Some(l.cmp(&r)))
        }
    }
}

/// Operands for a substring operator: normalized haystack and needle
fn substring_operands(
    def: &ColumnDef,
    left: &Value,
    right: &FilterValue,
) -> Result<Option<(String, String)>, QueryError> {
    if def.kind != ColumnKind::Text {
        return Err(QueryError::type_mismatch(
            def.name,
            "substring match requires a text column",
        ));
    }
    let needle = match right.as_scalar(def.name)? {
        ScalarValue::Text(s) => normalize::fold(s),
        ScalarValue::Number(_) => {
            return Err(QueryError::type_mismatch(
                def.name,
                "substring match requires a string value",
            ));
        }
    };
    Ok(normalize::text_of(left).map(|hay| (hay, needle)))
}

/// Collects bound parameter values during predicate compilation, in
/// placeholder order
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<String>,
}

impl SqlParams {
    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_col() -> ColumnDef {
        ColumnDef::new("BR_SHORT_TITLE", "BR_SHORT_TITLE", ColumnKind::Text)
    }

    fn number_col() -> ColumnDef {
        ColumnDef::new("BR_NMBR", "BR_NMBR", ColumnKind::Number)
    }

    fn date_col() -> ColumnDef {
        ColumnDef::new("SUBMIT_DATE", "SUBMIT_DATE", ColumnKind::Date)
    }

    #[test]
    fn parse_accepts_canonical_names_and_aliases() {
        assert_eq!(Operator::parse("equals").unwrap(), Operator::Equals);
        assert_eq!(Operator::parse("=").unwrap(), Operator::Equals);
        assert_eq!(Operator::parse("notEquals").unwrap(), Operator::NotEquals);
        assert_eq!(Operator::parse("<>").unwrap(), Operator::NotEquals);
        assert_eq!(Operator::parse(">").unwrap(), Operator::GreaterThan);
        assert_eq!(Operator::parse("in").unwrap(), Operator::In);
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!(matches!(
            Operator::parse("Equals"),
            Err(QueryError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            Operator::parse("CONTAINS"),
            Err(QueryError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn equals_is_case_insensitive_for_text() {
        let def = text_col();
        let right = FilterValue::text("server upgrade");
        assert!(Operator::Equals
            .evaluate(&def, &json!("Server Upgrade"), &right)
            .unwrap());
        assert!(!Operator::NotEquals
            .evaluate(&def, &json!("Server Upgrade"), &right)
            .unwrap());
    }

    #[test]
    fn contains_folds_both_operands() {
        let def = text_col();
        assert!(Operator::Contains
            .evaluate(
                &def,
                &json!("Dept of Correctional Services"),
                &FilterValue::text("CORRECTIONAL")
            )
            .unwrap());
    }

    #[test]
    fn substring_on_number_column_is_type_mismatch() {
        let def = number_col();
        let err = Operator::Contains
            .evaluate(&def, &json!(12345), &FilterValue::text("123"))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn null_row_value_fails_every_operator() {
        let def = text_col();
        for op in [Operator::Equals, Operator::NotEquals, Operator::Contains] {
            assert!(!op.evaluate(&def, &json!(null), &FilterValue::text("x")).unwrap());
        }
    }

    #[test]
    fn numeric_ordering_coerces_text_rows() {
        let def = number_col();
        let right = FilterValue::number(100.0);
        assert!(Operator::GreaterThan
            .evaluate(&def, &json!(250), &right)
            .unwrap());
        assert!(Operator::GreaterThan
            .evaluate(&def, &json!("250"), &right)
            .unwrap());
        assert!(!Operator::LessThan.evaluate(&def, &json!(250), &right).unwrap());
    }

    #[test]
    fn non_numeric_row_value_in_numeric_comparison_errors() {
        let def = number_col();
        let err = Operator::GreaterThan
            .evaluate(&def, &json!("not a number"), &FilterValue::number(1.0))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn date_ordering_uses_calendar_dates() {
        let def = date_col();
        let right = FilterValue::text("2024-01-01");
        assert!(Operator::GreaterThan
            .evaluate(&def, &json!("2024-03-15"), &right)
            .unwrap());
        assert!(Operator::Equals
            .evaluate(&def, &json!("2024-01-01T08:00:00Z"), &right)
            .unwrap());
    }

    #[test]
    fn in_matches_after_per_element_normalization() {
        let def = text_col();
        let right = FilterValue::list([
            ScalarValue::Text("High".to_string()),
            ScalarValue::Text(" MEDIUM ".to_string()),
        ]);
        assert!(Operator::In.evaluate(&def, &json!("medium"), &right).unwrap());
        assert!(!Operator::In.evaluate(&def, &json!("low"), &right).unwrap());
    }

    #[test]
    fn in_with_scalar_value_is_type_mismatch() {
        let def = text_col();
        let err = Operator::In
            .evaluate(&def, &json!("x"), &FilterValue::text("x"))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn scalar_operator_with_list_value_is_type_mismatch() {
        let def = text_col();
        let err = Operator::Equals
            .evaluate(&def, &json!("x"), &FilterValue::list([]))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { .. }));
    }

    #[test]
    fn validate_rejects_unknown_column() {
        let schema = BrSchema::bits();
        let criterion = FilterCriterion {
            column: "NOT_A_COLUMN".to_string(),
            operator: Operator::Equals,
            value: FilterValue::text("x"),
        };
        assert!(matches!(
            criterion.validate(&schema),
            Err(QueryError::UnknownColumn(name)) if name == "NOT_A_COLUMN"
        ));
    }

    #[test]
    fn validate_rejects_bad_value_for_declared_kind() {
        let schema = BrSchema::bits();
        let criterion = FilterCriterion {
            column: "BR_NMBR".to_string(),
            operator: Operator::GreaterThan,
            value: FilterValue::text("not a number"),
        };
        assert!(matches!(
            criterion.validate(&schema),
            Err(QueryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn criterion_deserializes_from_tool_arguments() {
        let criterion: FilterCriterion = serde_json::from_str(
            r#"{"column": "BR_SHORT_TITLE", "operator": "contains", "value": "upgrade"}"#,
        )
        .unwrap();
        assert_eq!(criterion.operator, Operator::Contains);
        assert_eq!(criterion.value, FilterValue::text("upgrade"));
    }

    #[test]
    fn criterion_rejects_unknown_fields() {
        let result: Result<FilterCriterion, _> = serde_json::from_str(
            r#"{"column": "BR_NMBR", "operator": "=", "value": 1, "extra": true}"#,
        );
        assert!(result.is_err());
    }
}
