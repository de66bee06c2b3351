//! ValueAdapter: casts inputs to model instances and serializes them back.

use json_model_equal::{deep_equal, diff_paths};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::attribute::AttributeType;
use crate::descriptor::ModelDescriptor;
use crate::error::{AdapterError, Result};
use crate::input::{Input, MapConvert, Mapping, CONVERSIONS};
use crate::policy::BadCastPolicy;

/// Mediates between instances of one model type and their JSON form.
///
/// The adapter holds the descriptor and the bad-cast policy read from it at
/// construction; nothing else. Clones share the descriptor.
///
/// A `ValueAdapter` is also an [`AttributeType`], which is how one model
/// nests inside another.
pub struct ValueAdapter<D: ModelDescriptor> {
    descriptor: Arc<D>,
    policy: BadCastPolicy,
}

impl<D: ModelDescriptor> ValueAdapter<D> {
    pub fn new(descriptor: D) -> Self {
        Self::shared(Arc::new(descriptor))
    }

    pub fn shared(descriptor: Arc<D>) -> Self {
        let policy = descriptor.bad_cast_policy();
        Self { descriptor, policy }
    }

    pub fn descriptor(&self) -> &Arc<D> {
        &self.descriptor
    }

    pub fn policy(&self) -> BadCastPolicy {
        self.policy
    }

    pub fn type_tag(&self) -> &str {
        self.descriptor.type_tag()
    }

    /// Resolves `input` to an instance or `None`.
    ///
    /// Tried in order: null, an instance of this model (returned as is),
    /// the input's native map view, its explicit mapping conversion. Inputs
    /// matching none of these follow the bad-cast policy.
    pub fn cast(&self, input: impl Into<Input<D::Instance>>) -> Result<Option<D::Instance>> {
        match input.into() {
            Input::Null => Ok(None),
            Input::Instance(instance) => {
                if self.descriptor.is_instance(&instance) {
                    Ok(Some(instance))
                } else {
                    self.reject(self.descriptor.inspect(&instance))
                }
            }
            Input::Json(value) => self.cast_convertible(&value),
            Input::Convertible(source) => self.cast_convertible(&*source),
        }
    }

    /// Same as [`cast`](Self::cast): stored mappings are just another castable input.
    pub fn deserialize(&self, input: impl Into<Input<D::Instance>>) -> Result<Option<D::Instance>> {
        self.cast(input)
    }

    pub fn load(&self, input: impl Into<Input<D::Instance>>) -> Result<Option<D::Instance>> {
        self.deserialize(input)
    }

    /// Produces the JSON form of `input`; null serializes to `Value::Null`.
    ///
    /// Instances are serialized directly. Anything else is cast first, so
    /// it can fail with [`AdapterError::BadCast`].
    pub fn serialize<'a>(&self, input: impl Into<Input<&'a D::Instance>>) -> Result<Value>
    where
        D::Instance: 'a,
    {
        let instance = match input.into() {
            Input::Null => return Ok(Value::Null),
            Input::Instance(instance) => {
                if !self.descriptor.is_instance(instance) {
                    return self
                        .reject(self.descriptor.inspect(instance))
                        .map(|_| Value::Null);
                }
                return self.serialize_instance(instance);
            }
            Input::Json(value) => self.cast_convertible(&value)?,
            Input::Convertible(source) => self.cast_convertible(&*source)?,
        };
        match instance {
            Some(instance) => self.serialize_instance(&instance),
            None => Ok(Value::Null),
        }
    }

    pub fn dump<'a>(&self, input: impl Into<Input<&'a D::Instance>>) -> Result<Value>
    where
        D::Instance: 'a,
    {
        self.serialize(input)
    }

    /// Whether `candidate` no longer serializes to `stored`.
    ///
    /// Re-serializes the candidate and compares structurally, which costs a
    /// full walk of the serialized form. Meant for mutable instances whose
    /// changes can't be seen by identity.
    pub fn changed_in_place<'a>(
        &self,
        stored: &Value,
        candidate: impl Into<Input<&'a D::Instance>>,
    ) -> Result<bool>
    where
        D::Instance: 'a,
    {
        let current = self.serialize(candidate)?;
        Ok(!deep_equal(stored, &current))
    }

    /// JSON pointers (into the serialized form) where `candidate` diverges from `stored`.
    pub fn changed_paths<'a>(
        &self,
        stored: &Value,
        candidate: impl Into<Input<&'a D::Instance>>,
    ) -> Result<Vec<String>>
    where
        D::Instance: 'a,
    {
        let current = self.serialize(candidate)?;
        Ok(diff_paths(stored, &current))
    }

    /// Builds the probe mapping for "stored JSON contains `value` at `key_path`".
    ///
    /// Each segment is an attribute name resolved against the registry of
    /// the model at that depth; the probe uses store keys. The leaf value is
    /// cast and serialized by the last attribute's type.
    ///
    /// ```
    /// use json_model::{AttributeDefinition, RecordDescriptor, StringType};
    /// use serde_json::json;
    ///
    /// let person = RecordDescriptor::builder("Person")
    ///     .attribute(AttributeDefinition::new("name", StringType).with_store_key("n"))
    ///     .build()
    ///     .unwrap();
    /// let probe = person.adapter().value_for_contains_query(&["name"], json!(7)).unwrap();
    /// assert_eq!(serde_json::Value::Object(probe), json!({"n": "7"}));
    /// ```
    pub fn value_for_contains_query<S: AsRef<str>>(
        &self,
        key_path: &[S],
        value: Value,
    ) -> Result<Mapping> {
        let segments: Vec<&str> = key_path.iter().map(|segment| segment.as_ref()).collect();
        self.contains_probe(&segments, value)
    }

    fn contains_probe(&self, key_path: &[&str], value: Value) -> Result<Mapping> {
        let (first, rest) = key_path.split_first().ok_or(AdapterError::EmptyKeyPath)?;
        let attribute = self.descriptor.attributes().fetch(first)?;
        let probe = if rest.is_empty() {
            let cast = attribute.cast(value)?;
            attribute.serialize(&cast)?
        } else {
            Value::Object(attribute.type_handler().value_for_contains_query(rest, value)?)
        };
        let mut mapping = Mapping::new();
        mapping.insert(attribute.store_key().to_string(), probe);
        Ok(mapping)
    }

    fn cast_convertible(&self, source: &dyn MapConvert) -> Result<Option<D::Instance>> {
        if source.is_null() {
            return Ok(None);
        }
        for conversion in &CONVERSIONS {
            if let Some(mapping) = (conversion.apply)(source) {
                tracing::trace!(
                    type_tag = self.type_tag(),
                    conversion = conversion.name,
                    "casting through map conversion"
                );
                return self.descriptor.new_from_serializable(mapping).map(Some);
            }
        }
        self.reject(source.inspect())
    }

    fn reject(&self, input: String) -> Result<Option<D::Instance>> {
        match self.policy {
            BadCastPolicy::ReturnNull => {
                tracing::debug!(
                    type_tag = self.type_tag(),
                    input = %input,
                    "uncastable input resolved to null"
                );
                Ok(None)
            }
            BadCastPolicy::Raise => Err(AdapterError::BadCast {
                input,
                type_tag: self.type_tag().to_string(),
            }),
        }
    }

    fn serialize_instance(&self, instance: &D::Instance) -> Result<Value> {
        self.descriptor.serializable_hash(instance).map(Value::Object)
    }
}

impl<D: ModelDescriptor> Clone for ValueAdapter<D> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            policy: self.policy,
        }
    }
}

impl<D: ModelDescriptor> fmt::Debug for ValueAdapter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueAdapter")
            .field("type_tag", &self.type_tag())
            .field("policy", &self.policy)
            .finish()
    }
}

/// As an attribute type, canonical values are the nested model's serialized mapping.
impl<D: ModelDescriptor> AttributeType for ValueAdapter<D> {
    fn type_tag(&self) -> &str {
        self.descriptor.type_tag()
    }

    fn cast(&self, value: Value) -> Result<Value> {
        match self.cast_convertible(&value)? {
            Some(instance) => self.serialize_instance(&instance),
            None => Ok(Value::Null),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value> {
        match self.cast_convertible(value)? {
            Some(instance) => self.serialize_instance(&instance),
            None => Ok(Value::Null),
        }
    }

    fn value_for_contains_query(&self, key_path: &[&str], value: Value) -> Result<Mapping> {
        self.contains_probe(key_path, value)
    }
}
