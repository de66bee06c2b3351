use serde_json::Value;

use crate::deep_equal::numbers_equal;

/// Escapes one JSON Pointer reference token (`~` -> `~0`, `/` -> `~1`).
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Lists the outermost locations where `a` and `b` diverge, as RFC 6901
/// pointers.
///
/// Objects and equal-length arrays are descended into; any other mismatch
/// (type change, scalar change, array length change, key present on one
/// side only) is reported at its own location. Object keys are reported in
/// `a`'s order followed by keys only present in `b`. An empty result means
/// the values are structurally equal.
///
/// ```
/// use json_model_equal::diff_paths;
/// use serde_json::json;
///
/// let stored = json!({"name": "x", "tags": ["a", "b"]});
/// let live = json!({"name": "y", "tags": ["a", "c"]});
/// assert_eq!(diff_paths(&stored, &live), vec!["/name", "/tags/1"]);
/// ```
pub fn diff_paths(a: &Value, b: &Value) -> Vec<String> {
    let mut out = Vec::new();
    let mut prefix = String::new();
    walk(a, b, &mut prefix, &mut out);
    out
}

fn walk(a: &Value, b: &Value, prefix: &mut String, out: &mut Vec<String>) {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, val_a) in a {
                let len = push_token(prefix, key);
                match b.get(key) {
                    Some(val_b) => walk(val_a, val_b, prefix, out),
                    None => out.push(prefix.clone()),
                }
                prefix.truncate(len);
            }
            for key in b.keys().filter(|key| !a.contains_key(*key)) {
                let len = push_token(prefix, key);
                out.push(prefix.clone());
                prefix.truncate(len);
            }
        }
        (Value::Array(a), Value::Array(b)) if a.len() == b.len() => {
            for (index, (val_a, val_b)) in a.iter().zip(b).enumerate() {
                let len = push_token(prefix, &index.to_string());
                walk(val_a, val_b, prefix, out);
                prefix.truncate(len);
            }
        }
        (Value::Number(x), Value::Number(y)) => {
            if !numbers_equal(x, y) {
                out.push(prefix.clone());
            }
        }
        _ => {
            if a != b {
                out.push(prefix.clone());
            }
        }
    }
}

/// Appends `/token` to `prefix`, returning the length to truncate back to.
fn push_token(prefix: &mut String, token: &str) -> usize {
    let len = prefix.len();
    prefix.push('/');
    prefix.push_str(&escape_component(token));
    len
}
