//! json-model - value adapter between typed model instances and their JSON
//! storage form.
//!
//! A [`ValueAdapter`] wraps one [`ModelDescriptor`] and offers:
//!
//! - [`cast`](ValueAdapter::cast) / [`deserialize`](ValueAdapter::deserialize) /
//!   [`load`](ValueAdapter::load): null, an instance, or anything that converts
//!   to a mapping becomes an instance (or null).
//! - [`serialize`](ValueAdapter::serialize) / [`dump`](ValueAdapter::dump):
//!   the JSON form of an instance or castable input.
//! - [`changed_in_place`](ValueAdapter::changed_in_place): structural
//!   comparison against a stored form, for mutable instances.
//! - [`value_for_contains_query`](ValueAdapter::value_for_contains_query):
//!   key-path probes for JSON containment queries.
//!
//! [`RecordDescriptor`] is a ready-made descriptor for models declared at
//! runtime, in code or as a [`RecordSchema`].
//!
//! ```
//! use json_model::{AttributeDefinition, Input, RecordDescriptor, StringType};
//! use serde_json::json;
//!
//! let person = RecordDescriptor::builder("Person")
//!     .attribute(AttributeDefinition::new("name", StringType))
//!     .build()
//!     .unwrap();
//! let adapter = person.adapter();
//!
//! let mut ada = adapter.cast(json!({"name": "Ada"})).unwrap().unwrap();
//! let stored = adapter.serialize(Input::Instance(&ada)).unwrap();
//! assert_eq!(stored, json!({"name": "Ada"}));
//!
//! ada.set("name", json!("Grace")).unwrap();
//! assert!(adapter.changed_in_place(&stored, Some(&ada)).unwrap());
//! ```

pub mod adapter;
pub mod attribute;
pub mod column;
pub mod descriptor;
pub mod error;
pub mod input;
pub mod policy;
pub mod record;

pub use adapter::ValueAdapter;
pub use attribute::{
    AttributeDefinition, AttributeRegistry, AttributeType, BooleanType, FloatType, IntegerType,
    JsonType, ListType, StringType,
};
pub use column::ColumnCoder;
pub use descriptor::ModelDescriptor;
pub use error::{AdapterError, BoxError, Result};
pub use input::{Input, MapConvert, Mapping, SerdeInput};
pub use policy::{BadCastPolicy, ParsePolicyError};
pub use record::{AttributeSchema, Record, RecordBuilder, RecordDescriptor, RecordSchema, TypeSchema};
