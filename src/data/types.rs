//! Row type shared by the executor and the in-memory engine

/// One business request record, keyed by logical column name
///
/// Insertion order is preserved so rows serialize in schema order.
pub type Row = serde_json::Map<String, serde_json::Value>;
