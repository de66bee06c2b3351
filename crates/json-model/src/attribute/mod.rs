//! Attribute definitions and the per-model attribute registry.

pub mod scalar;

pub use scalar::{BooleanType, FloatType, IntegerType, JsonType, ListType, StringType};

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{AdapterError, Result};
use crate::input::Mapping;

/// Type handler of one attribute: how raw values become canonical values
/// and how canonical values are stored.
pub trait AttributeType: fmt::Debug + Send + Sync {
    /// Tag naming the type in errors (`"string"`, a model name, ...).
    fn type_tag(&self) -> &str;

    /// Casts a raw value into this type's canonical value.
    fn cast(&self, value: Value) -> Result<Value>;

    /// Produces the storage form of a canonical value.
    fn serialize(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    /// Builds a contains-query probe for `key_path` inside values of this type.
    ///
    /// `key_path` is never empty here. Only model-typed attributes have
    /// nested attributes to resolve.
    fn value_for_contains_query(&self, key_path: &[&str], value: Value) -> Result<Mapping> {
        let _ = value;
        Err(AdapterError::NotNested {
            segment: key_path.first().copied().unwrap_or_default().to_string(),
            type_tag: self.type_tag().to_string(),
        })
    }
}

/// A named, typed attribute of a model.
#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    name: String,
    store_key: String,
    type_handler: Arc<dyn AttributeType>,
    default: Option<Value>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_handler: impl AttributeType + 'static) -> Self {
        Self::with_handler(name, Arc::new(type_handler))
    }

    pub fn with_handler(name: impl Into<String>, type_handler: Arc<dyn AttributeType>) -> Self {
        let name = name.into();
        Self {
            store_key: name.clone(),
            name,
            type_handler,
            default: None,
        }
    }

    /// Stores the attribute under `store_key` instead of its name.
    pub fn with_store_key(mut self, store_key: impl Into<String>) -> Self {
        self.store_key = store_key.into();
        self
    }

    /// Canonical value of the attribute when a mapping does not provide one.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn type_handler(&self) -> &Arc<dyn AttributeType> {
        &self.type_handler
    }

    pub fn default_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }

    pub fn cast(&self, value: Value) -> Result<Value> {
        self.type_handler
            .cast(value)
            .map_err(|err| err.with_attribute(&self.name))
    }

    pub fn serialize(&self, value: &Value) -> Result<Value> {
        self.type_handler
            .serialize(value)
            .map_err(|err| err.with_attribute(&self.name))
    }
}

/// Attributes of one model type, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    type_tag: String,
    attributes: Vec<AttributeDefinition>,
    by_name: HashMap<String, usize>,
}

impl AttributeRegistry {
    pub fn new(type_tag: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            ..Default::default()
        }
    }

    /// Registers an attribute. Re-registering a name replaces the earlier
    /// definition in place.
    pub fn insert(&mut self, attribute: AttributeDefinition) {
        match self.by_name.get(attribute.name()) {
            Some(&index) => self.attributes[index] = attribute,
            None => {
                self.by_name
                    .insert(attribute.name().to_string(), self.attributes.len());
                self.attributes.push(attribute);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.by_name.get(name).map(|&index| &self.attributes[index])
    }

    pub fn fetch(&self, name: &str) -> Result<&AttributeDefinition> {
        self.get(name).ok_or_else(|| AdapterError::AttributeNotFound {
            name: name.to_string(),
            type_tag: self.type_tag.clone(),
        })
    }

    pub fn find_by_store_key(&self, store_key: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attribute| attribute.store_key() == store_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }
}
