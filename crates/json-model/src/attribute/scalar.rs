//! Built-in attribute types.
//!
//! All of them keep null as null. Numeric and boolean types treat a blank
//! string as null, the way form and query-string input usually arrives.

use serde_json::{Number, Value};
use std::sync::Arc;

use super::AttributeType;
use crate::error::{AdapterError, Result};

fn invalid(expected: &'static str, value: &Value) -> AdapterError {
    AdapterError::InvalidAttribute {
        attribute: String::new(),
        expected,
        input: value.to_string(),
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn finite_float(f: f64, value: &Value) -> Result<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| invalid("float", value))
}

// -------------------------------------------------------------------------
// StringType

#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl AttributeType for StringType {
    fn type_tag(&self) -> &str {
        "string"
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null | Value::String(_) => Ok(value),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(invalid("string", &other)),
        }
    }
}

// -------------------------------------------------------------------------
// IntegerType

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

/// 2^63 and 2^64, both exact in f64.
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

impl IntegerType {
    /// Truncates toward zero; values outside the i64/u64 range are rejected.
    fn truncate(f: f64, value: &Value) -> Result<Value> {
        let t = f.trunc();
        if t >= -I64_END && t < I64_END {
            Ok(Value::from(t as i64))
        } else if t >= 0.0 && t < U64_END {
            Ok(Value::from(t as u64))
        } else {
            Err(invalid("integer", value))
        }
    }
}

impl AttributeType for IntegerType {
    fn type_tag(&self) -> &str {
        "integer"
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match &value {
            Value::Null => Ok(Value::Null),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n.clone())),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::truncate(f, &value),
                None => Err(invalid("integer", &value)),
            },
            Value::Bool(b) => Ok(Value::from(u8::from(*b))),
            Value::String(s) if is_blank(s) => Ok(Value::Null),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(Value::from(i));
                }
                if let Ok(u) = s.parse::<u64>() {
                    return Ok(Value::from(u));
                }
                match s.parse::<f64>() {
                    Ok(f) => Self::truncate(f, &value),
                    Err(_) => Err(invalid("integer", &value)),
                }
            }
            _ => Err(invalid("integer", &value)),
        }
    }
}

// -------------------------------------------------------------------------
// FloatType

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl AttributeType for FloatType {
    fn type_tag(&self) -> &str {
        "float"
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match &value {
            Value::Null => Ok(Value::Null),
            Value::Number(n) => match n.as_f64() {
                Some(f) => finite_float(f, &value),
                None => Err(invalid("float", &value)),
            },
            Value::Bool(b) => finite_float(if *b { 1.0 } else { 0.0 }, &value),
            Value::String(s) if is_blank(s) => Ok(Value::Null),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => finite_float(f, &value),
                Err(_) => Err(invalid("float", &value)),
            },
            _ => Err(invalid("float", &value)),
        }
    }
}

// -------------------------------------------------------------------------
// BooleanType

const TRUE_WORDS: [&str; 6] = ["true", "t", "1", "yes", "y", "on"];
const FALSE_WORDS: [&str; 6] = ["false", "f", "0", "no", "n", "off"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl AttributeType for BooleanType {
    fn type_tag(&self) -> &str {
        "boolean"
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match &value {
            Value::Null => Ok(Value::Null),
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 0.0 => Ok(Value::Bool(false)),
                Some(f) if f == 1.0 => Ok(Value::Bool(true)),
                _ => Err(invalid("boolean", &value)),
            },
            Value::String(s) if is_blank(s) => Ok(Value::Null),
            Value::String(s) => {
                let word = s.trim().to_ascii_lowercase();
                if TRUE_WORDS.contains(&word.as_str()) {
                    Ok(Value::Bool(true))
                } else if FALSE_WORDS.contains(&word.as_str()) {
                    Ok(Value::Bool(false))
                } else {
                    Err(invalid("boolean", &value))
                }
            }
            _ => Err(invalid("boolean", &value)),
        }
    }
}

// -------------------------------------------------------------------------
// JsonType

/// Any JSON value, stored as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonType;

impl AttributeType for JsonType {
    fn type_tag(&self) -> &str {
        "json"
    }

    fn cast(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

// -------------------------------------------------------------------------
// ListType

/// Homogeneous list; every element goes through the element type.
#[derive(Debug, Clone)]
pub struct ListType {
    element: Arc<dyn AttributeType>,
    tag: String,
}

impl ListType {
    pub fn new(element: impl AttributeType + 'static) -> Self {
        Self::of(Arc::new(element))
    }

    pub fn of(element: Arc<dyn AttributeType>) -> Self {
        let tag = format!("list<{}>", element.type_tag());
        Self { element, tag }
    }

    pub fn element(&self) -> &Arc<dyn AttributeType> {
        &self.element
    }
}

impl AttributeType for ListType {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.element.cast(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(invalid("list", &other)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.element.serialize(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }
}
