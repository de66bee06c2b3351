//! Input shapes accepted by [`ValueAdapter::cast`](crate::ValueAdapter::cast).
//!
//! After the null and nominal checks, anything else is offered to an ordered
//! list of map conversions. A type opts in by implementing [`MapConvert`]:
//!
//! - `map_view` is the implicit conversion: the value *is* a map (a JSON
//!   object, a `HashMap<String, Value>`).
//! - `to_mapping` is the explicit conversion: the value can deliberately be
//!   turned into one (a list of pairs, a serde struct, another record).
//!
//! The implicit view is always tried first.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A JSON object: the serializable form of a model instance.
pub type Mapping = Map<String, Value>;

/// Map-conversion capabilities of a castable input.
pub trait MapConvert: fmt::Debug {
    /// Whether this value stands for null (a JSON `null` does).
    fn is_null(&self) -> bool {
        false
    }

    /// Native map view, when the value is structurally a mapping.
    fn map_view(&self) -> Option<Mapping> {
        None
    }

    /// Deliberate conversion into a mapping.
    fn to_mapping(&self) -> Option<Mapping> {
        None
    }

    /// Representation used in bad-cast errors.
    fn inspect(&self) -> String {
        format!("{self:?}")
    }
}

/// One entry of the conversion list.
#[derive(Clone, Copy)]
pub(crate) struct Conversion {
    pub name: &'static str,
    pub apply: fn(&dyn MapConvert) -> Option<Mapping>,
}

fn via_map_view(source: &dyn MapConvert) -> Option<Mapping> {
    source.map_view()
}

fn via_to_mapping(source: &dyn MapConvert) -> Option<Mapping> {
    source.to_mapping()
}

/// Conversions in priority order.
pub(crate) const CONVERSIONS: [Conversion; 2] = [
    Conversion {
        name: "map_view",
        apply: via_map_view,
    },
    Conversion {
        name: "to_mapping",
        apply: via_to_mapping,
    },
];

/// A value handed to the adapter.
///
/// `I` is the instance representation: owned instances for casting,
/// borrowed ones for serializing.
#[derive(Debug)]
pub enum Input<I> {
    Null,
    /// Already an instance of the adapter's model type.
    Instance(I),
    /// A raw JSON value, typically straight from storage.
    Json(Value),
    /// Any other convertible value.
    Convertible(Box<dyn MapConvert>),
}

impl<I> Input<I> {
    pub fn convertible(source: impl MapConvert + 'static) -> Self {
        Self::Convertible(Box::new(source))
    }

    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Instance(_) => false,
            Self::Json(value) => value.is_null(),
            Self::Convertible(source) => source.is_null(),
        }
    }
}

impl<I> From<Value> for Input<I> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            other => Self::Json(other),
        }
    }
}

impl<I> From<Mapping> for Input<I> {
    fn from(mapping: Mapping) -> Self {
        Self::Json(Value::Object(mapping))
    }
}

impl<I> From<Option<I>> for Input<I> {
    fn from(instance: Option<I>) -> Self {
        match instance {
            Some(instance) => Self::Instance(instance),
            None => Self::Null,
        }
    }
}

// -------------------------------------------------------------------------
// Conversions for common shapes

impl MapConvert for Value {
    fn is_null(&self) -> bool {
        Value::is_null(self)
    }

    fn map_view(&self) -> Option<Mapping> {
        self.as_object().cloned()
    }

    /// `[[key, value], ...]` pairs.
    fn to_mapping(&self) -> Option<Mapping> {
        let pairs = self.as_array()?;
        let mut mapping = Mapping::new();
        for pair in pairs {
            match pair.as_array().map(Vec::as_slice) {
                Some([Value::String(key), value]) => {
                    mapping.insert(key.clone(), value.clone());
                }
                _ => return None,
            }
        }
        Some(mapping)
    }

    fn inspect(&self) -> String {
        self.to_string()
    }
}

impl MapConvert for Mapping {
    fn map_view(&self) -> Option<Mapping> {
        Some(self.clone())
    }

    fn inspect(&self) -> String {
        Value::Object(self.clone()).to_string()
    }
}

impl MapConvert for HashMap<String, Value> {
    fn map_view(&self) -> Option<Mapping> {
        Some(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl MapConvert for BTreeMap<String, Value> {
    fn map_view(&self) -> Option<Mapping> {
        Some(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl MapConvert for Vec<(String, Value)> {
    fn to_mapping(&self) -> Option<Mapping> {
        Some(self.iter().cloned().collect())
    }
}

/// Explicit conversion of any `Serialize` value that serializes to an object.
#[derive(Debug, Clone)]
pub struct SerdeInput<T>(pub T);

impl<T: Serialize + fmt::Debug> MapConvert for SerdeInput<T> {
    fn to_mapping(&self) -> Option<Mapping> {
        match serde_json::to_value(&self.0).ok()? {
            Value::Object(mapping) => Some(mapping),
            _ => None,
        }
    }

    fn inspect(&self) -> String {
        format!("{:?}", self.0)
    }
}
