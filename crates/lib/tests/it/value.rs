//! Value tests: equality, coercion, normalization and serde.

use arbor::{
    Kind, Object, ObjectId, Record, Shared, Value, coerce, normalize::normalize,
    value::deep_equal,
};
use chrono::{TimeZone, Utc};

use crate::helpers::{account_record, break_cycle, self_referencing_node};

// ===== EQUALITY =====

#[test]
fn test_deep_equal_follows_shared_nodes() {
    let a = Value::Shared(Shared::new(vec![1i64, 2]));
    let b = Value::Shared(Shared::new(vec![1i64, 2]));
    let c = Value::Shared(Shared::new(vec![1i64, 3]));

    assert!(deep_equal(&a, &b));
    assert!(!deep_equal(&a, &c));
}

#[test]
fn test_deep_equal_terminates_on_cycles() {
    let left = self_referencing_node();
    let right = self_referencing_node();

    assert_eq!(Value::Shared(left.clone()), Value::Shared(right.clone()));

    break_cycle(&left);
    break_cycle(&right);
}

#[test]
fn test_nan_equals_nan() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn test_kinds() {
    assert_eq!(Value::Null.kind(), Kind::Null);
    assert_eq!(Value::from(b"xy".as_slice()).kind(), Kind::Bytes);
    assert_eq!(Value::from(Object::new()).kind(), Kind::Object);
    assert_eq!(Value::from(ObjectId::from_bytes([1; 12])).kind(), Kind::Identifier);
    assert_eq!(Kind::Array.to_string(), "array");
}

// ===== COERCION =====

#[test]
fn test_coerce_never_fails() {
    assert_eq!(coerce::coerce(Kind::Int, &Value::from("12")), Value::Int(12));
    assert_eq!(coerce::coerce(Kind::String, &Value::Bool(true)), Value::from("true"));
    assert_eq!(coerce::coerce(Kind::Bool, &Value::from("maybe")), Value::Bool(false));
    assert!(coerce::to_float(&Value::Null).is_nan());
    assert_eq!(coerce::to_time(&Value::from([1u8, 2].as_slice())), coerce::zero_time());
}

#[test]
fn test_parse_int_saturates() {
    assert_eq!(coerce::parse_int("99999999999999999999"), i64::MAX);
    assert_eq!(coerce::parse_int("-99999999999999999999"), i64::MIN);
    assert_eq!(coerce::parse_int("1.5"), 0);
}

#[test]
fn test_to_string_forms() {
    let when = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();

    assert_eq!(coerce::to_string(&Value::from(when)), "2020-01-02T03:04:05Z");
    assert_eq!(coerce::to_string(&Value::Float(2.5)), "2.5");
    assert_eq!(coerce::to_string(&Value::from(vec!["a", "b"])), r#"["a","b"]"#);
    assert_eq!(
        coerce::to_string(&Value::from(ObjectId::from_bytes([0x0f; 12]))),
        "0f".repeat(12)
    );
}

#[test]
fn test_self_pointing_shared_reads_as_absent() {
    let node = Shared::new(Value::Null);
    node.replace(Value::Shared(node.clone()));
    let mut object = Object::new();
    object.insert("a", node.clone());
    object.insert("list", vec![Value::Shared(node.clone())]);

    assert_eq!(object.get_int("a", 7), 0);
    assert_eq!(object.get_string("a", "x"), "");
    assert!(!object.get_bool("a", true));
    assert!(object.get_float("a", 1.0).is_nan());
    assert_eq!(object.get_string_array("a", None), None);
    assert_eq!(object.get_float_array("a", None), None);
    assert_eq!(object.get_object_array("list"), Some(vec![Object::new()]));
    assert!(coerce::to_object(&Value::Shared(node.clone())).is_empty());

    break_cycle(&node);
}

#[test]
fn test_shared_chain_reads_through_to_the_value() {
    let tail = Shared::new(41i64);
    let head = Shared::new(Value::Shared(tail));
    let mut object = Object::new();
    object.insert("n", head);

    assert_eq!(object.get_int("n", 0), 41);
    assert_eq!(object.get_string("n", ""), "41");
}

// ===== NORMALIZATION =====

#[test]
fn test_normalize_record_tree() {
    let outer = Record::new("Envelope")
        .with("Account", account_record())
        .with("Items", vec![Value::Record(Record::new("Item").with("Sku", "x"))])
        .with("At", Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

    let normalized = normalize(&Value::Record(outer));
    let object = normalized.as_object().unwrap();

    assert_eq!(object.get_string("Account.Name", ""), "alice");
    assert!(!object.exists("Account.password"));
    assert_eq!(object.get_string("Items[0].Sku", ""), "x");
    assert!(matches!(object.get("At"), Some(Value::Time(_))));
}

#[test]
fn test_normalize_cycle_becomes_null() {
    let node = self_referencing_node();

    let normalized = normalize(&Value::Shared(node.clone()));
    let object = normalized.as_object().unwrap();

    assert_eq!(object.get_string("label", ""), "loop");
    assert_eq!(object.get("self"), Some(&Value::Null));

    break_cycle(&node);
}

// ===== SERDE =====

#[test]
fn test_serialize_special_values() {
    let mut object = Object::new()
        .with("bytes", b"hi".as_slice())
        .with("at", Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())
        .with("id", ObjectId::from_bytes([0xaa; 12]));
    object.insert("record", account_record());

    let json: serde_json::Value = serde_json::from_str(&object.to_string()).unwrap();

    assert_eq!(json["bytes"], "aGk=");
    assert_eq!(json["at"], "2020-01-02T03:04:05Z");
    assert_eq!(json["id"], "aa".repeat(12));
    assert_eq!(json["record"]["Name"], "alice");
    assert!(json["record"].get("password").is_none());
}

#[test]
fn test_serializing_a_cycle_fails() {
    let node = self_referencing_node();

    let err = Value::Shared(node.clone()).to_json_string().unwrap_err();
    assert!(err.is_serialization_error());

    break_cycle(&node);
}

#[test]
fn test_deserialize_value() {
    let value: Value = serde_json::from_str(r#"{"a":[1,2.5,"x",null,false]}"#).unwrap();

    let object = value.as_object().unwrap();
    let items = object.get("a").and_then(Value::as_array).unwrap();
    assert_eq!(items[0], Value::Int(1));
    assert_eq!(items[1], Value::Float(2.5));
    assert_eq!(items[2], Value::from("x"));
    assert!(items[3].is_null());
    assert_eq!(items[4], Value::Bool(false));
}
