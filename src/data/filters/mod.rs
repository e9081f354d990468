//! Two-stage query filter system
//!
//! Stage 1 ([`build_where_clause`]) compiles criteria into a parameterized
//! predicate the store executes; stage 2 ([`apply_filters`]) re-applies an
//! independent criteria list to fetched rows in memory. Both stages share the
//! [`Operator`] registry and the normalizer, so equivalent criteria select
//! the same rows in either stage.
//!
//! ## Usage
//!
//! ```no_run
//! use br_search::data::filters::{SqlParams, apply_filters, build_where_clause, parse_filters};
//! use br_search::data::schema::BrSchema;
//!
//! let schema = BrSchema::bits();
//! let json = r#"[{"column": "BR_SHORT_TITLE", "operator": "contains", "value": "upgrade"}]"#;
//! let filters = parse_filters(json, &schema).unwrap();
//! let mut params = SqlParams::default();
//! let predicate = build_where_clause(&filters, &schema, &mut params).unwrap();
//! # let rows = Vec::new();
//! let narrowed = apply_filters(rows, &filters, &schema).unwrap();
//! ```

mod builder;
mod engine;
mod normalize;
mod parser;
mod types;

pub use builder::build_where_clause;
pub use engine::apply_filters;
pub use normalize::{escape_like, fold};
pub use parser::parse_filters;
pub use types::{FilterCriterion, FilterValue, Operator, ScalarValue, SqlParams};
