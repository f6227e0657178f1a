//! Null pruning for JSON documents.
//!
//! The control plane rejects explicit nulls, so every payload passes through
//! [`sanitize`] immediately before it is sent.

use serde_json::{Map, Value};

/// Returns `value` with every null removed at every depth.
///
/// Arrays keep their surviving elements in order. Objects left empty after
/// pruning are removed from their parent. A null (or fully pruned object)
/// at the top level yields `None`.
#[must_use]
pub fn sanitize(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(Value::Array(items.iter().filter_map(sanitize).collect())),
        Value::Object(fields) => {
            let pruned: Map<String, Value> = fields
                .iter()
                .filter_map(|(key, field)| sanitize(field).map(|v| (key.clone(), v)))
                .collect();
            if pruned.is_empty() {
                None
            } else {
                Some(Value::Object(pruned))
            }
        }
        scalar => Some(scalar.clone()),
    }
}

/// Owned variant of [`sanitize`] for optional documents.
#[must_use]
pub fn sanitize_owned(value: Option<Value>) -> Option<Value> {
    value.as_ref().and_then(sanitize)
}
