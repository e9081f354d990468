//! Business request schema allow-list
//!
//! The set of columns a filter may reference, with their declared kinds and
//! physical store fields. Built once at startup and passed explicitly into
//! both filtering stages; never mutated afterwards.

/// Declared kind of a schema column, driving comparison semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

/// One allow-listed column: the logical name callers use, the physical field
/// in the reporting view, and the declared kind
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: &'static str,
    pub field: &'static str,
    pub kind: ColumnKind,
}

impl ColumnDef {
    pub const fn new(name: &'static str, field: &'static str, kind: ColumnKind) -> Self {
        Self { name, field, kind }
    }
}

/// Immutable column allow-list for business request searches
#[derive(Debug, Clone)]
pub struct BrSchema {
    columns: Vec<ColumnDef>,
}

impl BrSchema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Default schema for the BITS business request reporting view
    ///
    /// `BR_OWNER` is stored as `SR_OWNER` and the lead product description as
    /// `PROD_DESC`; every other logical name matches its physical field.
    pub fn bits() -> Self {
        use ColumnKind::{Date, Number, Text};
        Self::new(vec![
            ColumnDef::new("BR_NMBR", "BR_NMBR", Number),
            ColumnDef::new("BR_SHORT_TITLE", "BR_SHORT_TITLE", Text),
            ColumnDef::new("BR_TYPE_EN", "BR_TYPE_EN", Text),
            ColumnDef::new("PRIORITY_EN", "PRIORITY_EN", Text),
            ColumnDef::new("BR_ACTIVE_EN", "BR_ACTIVE_EN", Text),
            ColumnDef::new("RPT_GC_ORG_NAME_EN", "RPT_GC_ORG_NAME_EN", Text),
            ColumnDef::new("RPT_GC_ORG_NAME_FR", "RPT_GC_ORG_NAME_FR", Text),
            ColumnDef::new("ORG_TYPE_EN", "ORG_TYPE_EN", Text),
            ColumnDef::new("LEAD_PRODUCT_EN", "PROD_DESC", Text),
            ColumnDef::new("BR_OWNER", "SR_OWNER", Text),
            ColumnDef::new("BA_OPI", "BA_OPI", Text),
            ColumnDef::new("PM_OPI", "PM_OPI", Text),
            ColumnDef::new("TEAMLEADER", "TEAMLEADER", Text),
            ColumnDef::new("EXTRACTION_DATE", "EXTRACTION_DATE", Date),
            ColumnDef::new("SUBMIT_DATE", "SUBMIT_DATE", Date),
            ColumnDef::new("REQST_IMPL_DATE", "REQST_IMPL_DATE", Date),
            ColumnDef::new("TARGET_IMPL_DATE", "TARGET_IMPL_DATE", Date),
        ])
    }

    /// Look up a column by logical name, case-insensitively
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// SELECT projection mapping physical fields to logical names
    pub fn select_clause(&self) -> String {
        self.columns
            .iter()
            .map(|c| {
                if c.field == c.name {
                    c.name.to_string()
                } else {
                    format!("{} AS {}", c.field, c.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
