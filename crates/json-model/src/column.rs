//! Pluggable column coder surface for persistence layers.

use json_model_equal::deep_equal;
use serde_json::Value;

use crate::adapter::ValueAdapter;
use crate::descriptor::ModelDescriptor;
use crate::error::Result;

/// What a persistence layer needs from a serialized column: raw to live,
/// live to raw, and a divergence check between the two.
pub trait ColumnCoder {
    type Live;

    fn load(&self, raw: Value) -> Result<Option<Self::Live>>;

    fn dump(&self, live: Option<&Self::Live>) -> Result<Value>;

    fn changed_in_place(&self, raw: &Value, live: Option<&Self::Live>) -> Result<bool> {
        Ok(!deep_equal(raw, &self.dump(live)?))
    }
}

impl<D: ModelDescriptor> ColumnCoder for ValueAdapter<D> {
    type Live = D::Instance;

    fn load(&self, raw: Value) -> Result<Option<D::Instance>> {
        self.deserialize(raw)
    }

    fn dump(&self, live: Option<&D::Instance>) -> Result<Value> {
        self.serialize(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeDefinition, StringType};
    use crate::record::{Record, RecordDescriptor};
    use serde_json::json;

    fn coder() -> Box<dyn ColumnCoder<Live = Record>> {
        let tag = RecordDescriptor::builder("Tag")
            .attribute(AttributeDefinition::new("label", StringType))
            .build()
            .unwrap();
        Box::new(tag.adapter())
    }

    #[test]
    fn usable_as_trait_object() {
        let coder = coder();
        let mut live = coder.load(json!({"label": "a"})).unwrap().unwrap();
        let raw = coder.dump(Some(&live)).unwrap();
        assert_eq!(raw, json!({"label": "a"}));
        assert!(!coder.changed_in_place(&raw, Some(&live)).unwrap());
        live.set("label", json!("b")).unwrap();
        assert!(coder.changed_in_place(&raw, Some(&live)).unwrap());
    }

    #[test]
    fn null_column() {
        let coder = coder();
        assert!(coder.load(Value::Null).unwrap().is_none());
        assert_eq!(coder.dump(None).unwrap(), Value::Null);
        assert!(!coder.changed_in_place(&Value::Null, None).unwrap());
    }
}
