//! Adapter contract matrix: casting, serialization, change detection and
//! contains-query projection over record models.

use json_model::{
    AdapterError, AttributeDefinition, BadCastPolicy, FloatType, Input, IntegerType, ListType,
    MapConvert, Mapping, Record, RecordDescriptor, SerdeInput, StringType, ValueAdapter,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

fn address() -> RecordDescriptor {
    RecordDescriptor::builder("Address")
        .attribute(AttributeDefinition::new("city", StringType).with_store_key("city_name"))
        .attribute(AttributeDefinition::new("zip", StringType))
        .build()
        .unwrap()
}

fn person_with(policy: BadCastPolicy) -> RecordDescriptor {
    RecordDescriptor::builder("Person")
        .bad_cast(policy)
        .attribute(AttributeDefinition::new("name", StringType))
        .attribute(AttributeDefinition::new("age", IntegerType))
        .attribute(AttributeDefinition::new("score", FloatType))
        .attribute(AttributeDefinition::new("tags", ListType::new(StringType)))
        .attribute(AttributeDefinition::new("address", address().adapter()).with_store_key("addr"))
        .build()
        .unwrap()
}

fn people() -> ValueAdapter<RecordDescriptor> {
    person_with(BadCastPolicy::Raise).adapter()
}

// ---------------------------------------------------------------------------
// cast
// ---------------------------------------------------------------------------

#[test]
fn cast_null_is_distinct_from_empty_instance() {
    let adapter = people();
    assert!(adapter.cast(Value::Null).unwrap().is_none());
    assert!(adapter.cast(Input::Null).unwrap().is_none());

    let empty = adapter.cast(json!({})).unwrap().expect("empty mapping casts to an instance");
    assert_eq!(empty, adapter.descriptor().new_record());
    assert_eq!(adapter.serialize(Some(&empty)).unwrap()["name"], Value::Null);
}

#[test]
fn cast_instance_is_identity() {
    let adapter = people();
    let record = adapter.cast(json!({"name": "x", "tags": ["a"]})).unwrap().unwrap();
    let tags_ptr = record.get("tags").unwrap().as_array().unwrap().as_ptr();

    let again = adapter.cast(Input::Instance(record)).unwrap().unwrap();
    assert_eq!(again.get("tags").unwrap().as_array().unwrap().as_ptr(), tags_ptr);
}

#[test]
fn cast_map_like_value() {
    let record = people().cast(json!({"name": "x"})).unwrap().unwrap();
    assert_eq!(record.get("name"), Some(&json!("x")));
}

#[test]
fn cast_accepts_every_map_shape() {
    let adapter = people();
    let expected = adapter.cast(json!({"name": "x", "age": 3})).unwrap().unwrap();

    let mut hash = HashMap::new();
    hash.insert("name".to_string(), json!("x"));
    hash.insert("age".to_string(), json!("3"));
    let mut tree = BTreeMap::new();
    tree.insert("name".to_string(), json!("x"));
    tree.insert("age".to_string(), json!(3.2));
    let pairs = vec![("name".to_string(), json!("x")), ("age".to_string(), json!(3))];

    #[derive(Debug, serde::Serialize)]
    struct Form<'a> {
        name: &'a str,
        age: u32,
    }

    let inputs: Vec<Input<Record>> = vec![
        Input::convertible(hash),
        Input::convertible(tree),
        Input::convertible(pairs),
        Input::convertible(SerdeInput(Form { name: "x", age: 3 })),
        Input::from(json!([["name", "x"], ["age", 3]])),
        Input::from(json!({"name": "x", "age": 3}).as_object().cloned().unwrap()),
    ];
    for input in inputs {
        assert_eq!(adapter.cast(input).unwrap().as_ref(), Some(&expected));
    }
}

/// Offers both a native map view and a different explicit conversion.
#[derive(Debug)]
struct TwoFaced;

impl MapConvert for TwoFaced {
    fn map_view(&self) -> Option<Mapping> {
        json!({"name": "view"}).as_object().cloned()
    }

    fn to_mapping(&self) -> Option<Mapping> {
        json!({"name": "explicit"}).as_object().cloned()
    }
}

#[test]
fn cast_prefers_map_view_over_explicit_conversion() {
    let record = people().cast(Input::convertible(TwoFaced)).unwrap().unwrap();
    assert_eq!(record.get("name"), Some(&json!("view")));
    assert_eq!(
        people().serialize(Input::convertible(TwoFaced)).unwrap()["name"],
        json!("view")
    );
}

#[test]
fn cast_scalar_raises_under_default_policy() {
    let err = people().cast(json!(42)).unwrap_err();
    match err {
        AdapterError::BadCast { input, type_tag } => {
            assert_eq!(input, "42");
            assert_eq!(type_tag, "Person");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn cast_scalar_is_null_under_lenient_policy() {
    let adapter = person_with(BadCastPolicy::ReturnNull).adapter();
    assert!(adapter.cast(json!(42)).unwrap().is_none());
    assert!(adapter.cast(json!("text")).unwrap().is_none());
    assert!(adapter.cast(json!([1, 2])).unwrap().is_none());
}

#[test]
fn lenient_policy_does_not_swallow_attribute_errors() {
    let adapter = person_with(BadCastPolicy::ReturnNull).adapter();
    let err = adapter.cast(json!({"age": "old"})).unwrap_err();
    assert!(matches!(err, AdapterError::InvalidAttribute { ref attribute, .. } if attribute == "age"));
}

#[test]
fn nested_bad_cast_propagates_from_inner_model() {
    let err = people().cast(json!({"address": 5})).unwrap_err();
    assert!(matches!(err, AdapterError::BadCast { ref type_tag, .. } if type_tag == "Address"));
}

// ---------------------------------------------------------------------------
// serialize / deserialize
// ---------------------------------------------------------------------------

#[test]
fn serialize_produces_store_keys() {
    let adapter = people();
    let stored = adapter
        .serialize(json!({
            "name": "Ada",
            "age": "36",
            "tags": ["x"],
            "address": {"city": "Paris"}
        }))
        .unwrap();
    assert_eq!(
        stored,
        json!({
            "name": "Ada",
            "age": 36,
            "score": null,
            "tags": ["x"],
            "addr": {"city_name": "Paris", "zip": null}
        })
    );
}

#[test]
fn serialize_null_and_uncastable() {
    let adapter = people();
    assert_eq!(adapter.serialize(Input::Null).unwrap(), Value::Null);
    assert_eq!(adapter.dump(None).unwrap(), Value::Null);
    assert!(matches!(adapter.serialize(json!(1)), Err(AdapterError::BadCast { .. })));
}

#[test]
fn deserialize_and_load_match_cast() {
    let adapter = people();
    let raw = json!({"name": "x", "addr": {"city_name": "Oslo"}});
    let cast = adapter.cast(raw.clone()).unwrap();
    assert_eq!(adapter.deserialize(raw.clone()).unwrap(), cast);
    assert_eq!(adapter.load(raw).unwrap(), cast);
    assert_eq!(
        cast.unwrap().get("address"),
        Some(&json!({"city_name": "Oslo", "zip": null}))
    );
}

// ---------------------------------------------------------------------------
// changed_in_place
// ---------------------------------------------------------------------------

#[test]
fn changed_in_place_tracks_mutation() {
    let adapter = people();
    let mut record = adapter
        .cast(json!({"name": "Ada", "address": {"city": "Paris"}}))
        .unwrap()
        .unwrap();
    let stored = adapter.serialize(Some(&record)).unwrap();
    assert!(!adapter.changed_in_place(&stored, Some(&record)).unwrap());

    record.set("address", json!({"city": "Lyon"})).unwrap();
    assert!(adapter.changed_in_place(&stored, Some(&record)).unwrap());
    assert_eq!(
        adapter.changed_paths(&stored, Some(&record)).unwrap(),
        vec!["/addr/city_name"]
    );
}

#[test]
fn changed_in_place_ignores_stored_key_order() {
    let adapter = people();
    let record = adapter.cast(json!({"name": "Ada"})).unwrap().unwrap();
    let stored: Value = serde_json::from_str(
        r#"{"addr":null,"tags":null,"score":null,"age":null,"name":"Ada"}"#,
    )
    .unwrap();
    assert!(!adapter.changed_in_place(&stored, Some(&record)).unwrap());
}

#[test]
fn changed_in_place_against_raw_candidate() {
    let adapter = people();
    let stored = adapter.serialize(json!({"age": 1})).unwrap();
    assert!(!adapter.changed_in_place(&stored, json!({"age": "1"})).unwrap());
    assert!(adapter.changed_in_place(&stored, json!({"age": 2})).unwrap());
}

// ---------------------------------------------------------------------------
// value_for_contains_query
// ---------------------------------------------------------------------------

#[test]
fn contains_query_nests_store_keys() {
    let probe = people()
        .value_for_contains_query(&["address", "city"], json!("Paris"))
        .unwrap();
    assert_eq!(Value::Object(probe), json!({"addr": {"city_name": "Paris"}}));
}

#[test]
fn contains_query_leaf_is_cast_and_serialized() {
    let adapter = people();
    let probe = adapter.value_for_contains_query(&["age"], json!("7")).unwrap();
    assert_eq!(Value::Object(probe), json!({"age": 7}));

    let probe = adapter
        .value_for_contains_query(&["address"], json!({"city": "Rome"}))
        .unwrap();
    assert_eq!(
        Value::Object(probe),
        json!({"addr": {"city_name": "Rome", "zip": null}})
    );
}

#[test]
fn contains_query_accepts_owned_segments() {
    let path: Vec<String> = vec!["address".into(), "zip".into()];
    let probe: Mapping = people().value_for_contains_query(&path, json!(75001)).unwrap();
    assert_eq!(Value::Object(probe), json!({"addr": {"zip": "75001"}}));
}

#[test]
fn contains_query_missing_attribute() {
    let err = people()
        .value_for_contains_query(&["missing"], json!(1))
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::AttributeNotFound { ref name, ref type_tag } if name == "missing" && type_tag == "Person"
    ));

    let err = people()
        .value_for_contains_query(&["address", "street"], json!(1))
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::AttributeNotFound { ref name, ref type_tag } if name == "street" && type_tag == "Address"
    ));
}

#[test]
fn contains_query_is_not_policy_controlled() {
    let adapter = person_with(BadCastPolicy::ReturnNull).adapter();
    assert!(adapter.value_for_contains_query(&["missing"], json!(1)).is_err());
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

fn arb_person_input() -> impl Strategy<Value = Value> {
    (
        prop::option::of("[a-zA-Z ]{0,12}"),
        prop::option::of(any::<i32>()),
        prop::option::of(-1.0e6f64..1.0e6),
        prop::option::of(prop::collection::vec("[a-z]{1,5}", 0..4)),
        prop::option::of(prop::option::of("[A-Z][a-z]{0,8}")),
    )
        .prop_map(|(name, age, score, tags, city)| {
            let mut mapping = Mapping::new();
            if let Some(name) = name {
                mapping.insert("name".into(), json!(name));
            }
            if let Some(age) = age {
                mapping.insert("age".into(), json!(age));
            }
            if let Some(score) = score {
                mapping.insert("score".into(), json!(score));
            }
            if let Some(tags) = tags {
                mapping.insert("tags".into(), json!(tags));
            }
            if let Some(city) = city {
                mapping.insert("address".into(), json!({ "city": city }));
            }
            Value::Object(mapping)
        })
}

proptest! {
    #[test]
    fn deserialize_serialize_round_trip(input in arb_person_input()) {
        let adapter = people();
        let record = adapter.cast(input).unwrap().unwrap();
        let stored = adapter.serialize(Some(&record)).unwrap();
        let restored = adapter.deserialize(stored.clone()).unwrap().unwrap();
        prop_assert_eq!(&restored, &record);
        prop_assert!(!adapter.changed_in_place(&stored, Some(&restored)).unwrap());
    }
}
