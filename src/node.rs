//! Permissive accessors over an already-parsed JSON tree.
//!
//! Every lookup answers with a sentinel (`None`, `""` or NaN) instead of failing,
//! so callers can walk untrusted map data without a single error path.

use serde_json::{Map, Value};

pub trait NodeExt {
    /// Field of an object node. Absent for non-objects.
    fn field(&self, key: &str) -> Option<&Value>;

    /// String field, or `""` when missing or not a string.
    fn field_str(&self, key: &str) -> &str;

    fn field_array(&self, key: &str) -> Option<&[Value]>;

    fn field_object(&self, key: &str) -> Option<&Map<String, Value>>;

    /// Numeric element of an array node, or NaN when missing or non-numeric.
    fn number_at(&self, index: usize) -> f64;
}

impl NodeExt for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    fn field_str(&self, key: &str) -> &str {
        self.field(key).and_then(Value::as_str).unwrap_or("")
    }

    fn field_array(&self, key: &str) -> Option<&[Value]> {
        self.field(key)
            .and_then(Value::as_array)
            .map(|arr| arr.as_slice())
    }

    fn field_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.field(key).and_then(Value::as_object)
    }

    fn number_at(&self, index: usize) -> f64 {
        self.as_array()
            .map(|arr| number_in(arr, index))
            .unwrap_or(f64::NAN)
    }
}

/// Numeric element of a slice of nodes, or NaN when missing or non-numeric.
pub fn number_in(values: &[Value], index: usize) -> f64 {
    values.get(index).map(as_number).unwrap_or(f64::NAN)
}

// Numeric strings are coerced the way lenient JSON readers do; anything
// non-finite counts as missing.
fn as_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(f64::NAN)
}
