//! Record: a model whose attributes are declared at runtime.
//!
//! [`RecordDescriptor`] plays the model type and [`Record`] its instances.
//! Descriptors come from [`RecordDescriptor::builder`] or from a
//! deserialized [`RecordSchema`].

pub mod schema;

pub use schema::{AttributeSchema, RecordSchema, TypeSchema};

use json_model_equal::deep_equal_map;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::adapter::ValueAdapter;
use crate::attribute::{AttributeDefinition, AttributeRegistry};
use crate::descriptor::ModelDescriptor;
use crate::error::{AdapterError, Result};
use crate::input::{MapConvert, Mapping};
use crate::policy::BadCastPolicy;

struct RecordShape {
    policy: BadCastPolicy,
    attributes: AttributeRegistry,
}

/// Runtime model type. Clones share one shape; records are instances of
/// the descriptor that built them (or a clone of it).
#[derive(Clone)]
pub struct RecordDescriptor {
    shape: Arc<RecordShape>,
}

#[derive(Debug)]
pub struct RecordBuilder {
    policy: BadCastPolicy,
    attributes: AttributeRegistry,
}

impl RecordBuilder {
    fn duplicate_store_key(&self) -> Option<String> {
        let mut seen = HashSet::new();
        self.attributes
            .iter()
            .map(|attribute| attribute.store_key())
            .find(|store_key| !seen.insert(*store_key))
            .map(str::to_string)
    }

    pub fn bad_cast(mut self, policy: BadCastPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn attribute(mut self, attribute: AttributeDefinition) -> Self {
        self.attributes.insert(attribute);
        self
    }

    pub fn build(self) -> Result<RecordDescriptor> {
        if let Some(store_key) = self.duplicate_store_key() {
            return Err(AdapterError::DuplicateStoreKey {
                store_key,
                type_tag: self.attributes.type_tag().to_string(),
            });
        }
        tracing::debug!(
            type_tag = self.attributes.type_tag(),
            attributes = self.attributes.len(),
            policy = %self.policy,
            "record descriptor built"
        );
        Ok(RecordDescriptor {
            shape: Arc::new(RecordShape {
                policy: self.policy,
                attributes: self.attributes,
            }),
        })
    }
}

impl RecordDescriptor {
    pub fn builder(type_tag: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            policy: BadCastPolicy::default(),
            attributes: AttributeRegistry::new(type_tag),
        }
    }

    /// A record with every attribute at its default.
    pub fn new_record(&self) -> Record {
        let values = self
            .shape
            .attributes
            .iter()
            .map(|attribute| (attribute.name().to_string(), attribute.default_value()))
            .collect();
        Record {
            descriptor: self.clone(),
            values,
        }
    }

    pub fn adapter(&self) -> ValueAdapter<RecordDescriptor> {
        ValueAdapter::new(self.clone())
    }

    fn same_shape(&self, other: &RecordDescriptor) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape)
    }

    /// Same tag and the same attributes (name, store key, type) in the same order.
    fn same_layout(&self, other: &RecordDescriptor) -> bool {
        if self.same_shape(other) {
            return true;
        }
        let (ours, theirs) = (&self.shape.attributes, &other.shape.attributes);
        ours.type_tag() == theirs.type_tag()
            && ours.len() == theirs.len()
            && ours.iter().zip(theirs.iter()).all(|(a, b)| {
                a.name() == b.name()
                    && a.store_key() == b.store_key()
                    && a.type_handler().type_tag() == b.type_handler().type_tag()
            })
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.shape.attributes.iter().map(|a| a.name()).collect();
        f.debug_struct("RecordDescriptor")
            .field("type_tag", &self.type_tag())
            .field("policy", &self.shape.policy)
            .field("attributes", &names)
            .finish()
    }
}

impl ModelDescriptor for RecordDescriptor {
    type Instance = Record;

    fn type_tag(&self) -> &str {
        self.shape.attributes.type_tag()
    }

    fn bad_cast_policy(&self) -> BadCastPolicy {
        self.shape.policy
    }

    fn is_instance(&self, record: &Record) -> bool {
        self.same_shape(&record.descriptor)
    }

    fn inspect(&self, record: &Record) -> String {
        format!("{record:?}")
    }

    fn attributes(&self) -> &AttributeRegistry {
        &self.shape.attributes
    }

    /// Keys are matched against store keys first, then attribute names.
    fn new_from_serializable(&self, mapping: Mapping) -> Result<Record> {
        let attributes = &self.shape.attributes;
        let mut record = self.new_record();
        for (key, value) in mapping {
            let attribute = match attributes
                .find_by_store_key(&key)
                .or_else(|| attributes.get(&key))
            {
                Some(attribute) => attribute,
                None => {
                    return Err(AdapterError::UnknownAttribute {
                        key,
                        type_tag: self.type_tag().to_string(),
                    })
                }
            };
            let cast = attribute.cast(value)?;
            record.values.insert(attribute.name().to_string(), cast);
        }
        Ok(record)
    }

    fn serializable_hash(&self, record: &Record) -> Result<Mapping> {
        let mut mapping = Mapping::new();
        for attribute in self.shape.attributes.iter() {
            let value = record.values.get(attribute.name()).unwrap_or(&Value::Null);
            mapping.insert(attribute.store_key().to_string(), attribute.serialize(value)?);
        }
        Ok(mapping)
    }
}

/// Instance of a [`RecordDescriptor`]. Values are held in canonical form,
/// keyed by attribute name, in declaration order.
#[derive(Clone)]
pub struct Record {
    descriptor: RecordDescriptor,
    values: Mapping,
}

impl Record {
    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    pub fn type_tag(&self) -> &str {
        self.descriptor.type_tag()
    }

    /// `None` only for names that are not attributes of this record.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Casts `value` through the attribute and stores it.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let attribute = self.descriptor.attributes().fetch(name)?;
        let cast = attribute.cast(value)?;
        self.values.insert(name.to_string(), cast);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn to_serializable(&self) -> Result<Mapping> {
        self.descriptor.serializable_hash(self)
    }
}

/// Records built by separate but identically declared descriptors compare equal.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.same_layout(&other.descriptor)
            && deep_equal_map(&self.values, &other.values)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{} {}>", self.type_tag(), Value::Object(self.values.clone()))
    }
}

/// Explicit conversion through the serializable mapping, so a record can
/// seed another model whose store keys overlap its own.
impl MapConvert for Record {
    fn to_mapping(&self) -> Option<Mapping> {
        self.to_serializable().ok()
    }

    fn inspect(&self) -> String {
        format!("{self:?}")
    }
}
