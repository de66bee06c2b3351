use serde_json::{Map, Number, Value};

/// Structural equality of two JSON values.
///
/// Objects compare by key set and per-key value, regardless of insertion
/// order. Numbers compare by numeric value, so `1` and `1.0` are equal;
/// everything else must match in type and content.
///
/// # Examples
///
/// ```
/// use json_model_equal::deep_equal;
/// use serde_json::json;
///
/// assert!(deep_equal(&json!({"a": 1, "b": [true]}), &json!({"b": [true], "a": 1.0})));
/// assert!(!deep_equal(&json!({"a": 1}), &json!({"a": "1"})));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| deep_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => deep_equal_map(a, b),
        _ => false,
    }
}

/// Structural equality of two JSON objects (see [`deep_equal`]).
pub fn deep_equal_map(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(key, val_a)| match b.get(key) {
        Some(val_b) => deep_equal(val_a, val_b),
        None => false,
    })
}

pub(crate) fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    // One side is a float (or the integers straddle the i64/u64 split).
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
