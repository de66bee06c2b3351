//! Record schemas: record descriptors declared as data.
//!
//! ```json
//! {
//!   "name": "Person",
//!   "bad_cast": "nil",
//!   "attributes": [
//!     {"name": "name", "type": "string"},
//!     {"name": "tags", "type": {"list": "string"}, "default": []},
//!     {"name": "address", "store_key": "addr", "type": {"model": {
//!       "name": "Address",
//!       "attributes": [{"name": "city", "store_key": "city_name", "type": "string"}]
//!     }}}
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::RecordDescriptor;
use crate::attribute::{
    AttributeDefinition, AttributeType, BooleanType, FloatType, IntegerType, JsonType, ListType,
    StringType,
};
use crate::error::Result;
use crate::policy::BadCastPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub bad_cast: BadCastPolicy,
    #[serde(default)]
    pub attributes: Vec<AttributeSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,
    #[serde(rename = "type")]
    pub type_: TypeSchema,
    /// Raw default; cast through the attribute type when the descriptor is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSchema {
    String,
    Integer,
    Float,
    Boolean,
    Json,
    List(Box<TypeSchema>),
    Model(Box<RecordSchema>),
}

impl TypeSchema {
    pub fn build(&self) -> Result<Arc<dyn AttributeType>> {
        let handler: Arc<dyn AttributeType> = match self {
            Self::String => Arc::new(StringType),
            Self::Integer => Arc::new(IntegerType),
            Self::Float => Arc::new(FloatType),
            Self::Boolean => Arc::new(BooleanType),
            Self::Json => Arc::new(JsonType),
            Self::List(element) => Arc::new(ListType::of(element.build()?)),
            Self::Model(schema) => Arc::new(schema.build()?.adapter()),
        };
        Ok(handler)
    }
}

impl AttributeSchema {
    pub fn build(&self) -> Result<AttributeDefinition> {
        let mut attribute = AttributeDefinition::with_handler(&self.name, self.type_.build()?);
        if let Some(store_key) = &self.store_key {
            attribute = attribute.with_store_key(store_key);
        }
        if let Some(default) = &self.default {
            let default = attribute.cast(default.clone())?;
            attribute = attribute.with_default(default);
        }
        Ok(attribute)
    }
}

impl RecordSchema {
    pub fn build(&self) -> Result<RecordDescriptor> {
        let mut builder = RecordDescriptor::builder(&self.name).bad_cast(self.bad_cast);
        for attribute in &self.attributes {
            builder = builder.attribute(attribute.build()?);
        }
        builder.build()
    }
}

impl RecordDescriptor {
    pub fn from_schema(schema: &RecordSchema) -> Result<Self> {
        schema.build()
    }

    pub fn from_json(schema: Value) -> Result<Self> {
        let schema: RecordSchema = serde_json::from_value(schema)?;
        schema.build()
    }
}
