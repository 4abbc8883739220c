//! Merging, normalization inputs and JSON conversions.

use std::collections::HashMap;

use arbor::{Error, Kind, Object, ObjectId, Record, Shared, Value};
use serde::{Deserialize, Serialize};

use crate::helpers::{account_record, sample_object};

// ===== NORMALIZATION INPUTS =====

#[test]
fn test_normalized_from_json_text_and_bytes() {
    let text = r#"{"a":{"b":1}}"#;

    assert_eq!(Object::normalized(text).get_int("a.b", 0), 1);
    assert_eq!(Object::normalized(text.to_string()).get_int("a.b", 0), 1);
    assert_eq!(Object::normalized(text.as_bytes()).get_int("a.b", 0), 1);
    assert_eq!(Object::normalized(text.as_bytes().to_vec()).get_int("a.b", 0), 1);
}

#[test]
fn test_invalid_json_yields_empty_object() {
    assert!(Object::normalized("{not json").is_empty());
    assert!(Object::normalized("[1,2]").is_empty());
    assert!(Object::try_from_json("{not json").is_err());
}

#[test]
fn test_normalized_from_object_is_a_copy() {
    let source = sample_object();
    let mut copy = Object::normalized(&source);

    copy.set("owner.name", "grace");

    assert_eq!(source.get_string("owner.name", ""), "ada");
    assert_eq!(copy.get_string("owner.name", ""), "grace");
}

#[test]
fn test_normalized_from_map() {
    let mut map = HashMap::new();
    map.insert("account".to_string(), Value::Record(account_record()));
    map.insert("id".to_string(), Value::from(ObjectId::from_bytes([0xab; 12])));

    let object = Object::normalized(map);

    assert_eq!(object.get_string("account.Name", ""), "alice");
    assert_eq!(object.get_string("id", ""), "ab".repeat(12));
}

#[test]
fn test_normalized_from_record() {
    let object = Object::normalized(account_record());

    assert_eq!(object.get_string("Name", ""), "alice");
    assert_eq!(object.get_int("score", 0), 12);
    assert!(!object.exists("email"));
    assert!(!object.exists("Internal"));
    assert!(!object.exists("password"));
    assert_eq!(object.len(), 2);
}

#[test]
fn test_normalized_from_value() {
    let shared = Shared::new(Object::new().with("k", "v"));

    assert_eq!(Object::normalized(Value::Shared(shared)).get_string("k", ""), "v");
    assert!(Object::normalized(Value::Int(3)).is_empty());
}

#[test]
fn test_from_serialize() {
    #[derive(Serialize)]
    struct Settings {
        name: &'static str,
        retries: u8,
    }

    let object = Object::from_serialize(&Settings {
        name: "svc",
        retries: 3,
    })
    .unwrap();
    assert_eq!(object.get_string("name", ""), "svc");
    assert_eq!(object.get_int("retries", 0), 3);

    let err = Object::from_serialize(&[1, 2]).unwrap_err();
    assert!(matches!(err, Error::NotAnObject { kind: Kind::Array }));
    assert_eq!(err.module(), "object");
}

// ===== JSON =====

#[test]
fn test_json_round_trip_keeps_order() {
    let text = r#"{"z":1,"a":{"y":[1,2.5,"s",null,true]},"m":"x"}"#;
    let object = Object::from_json(text);

    assert_eq!(object.to_string(), text);
    assert_eq!(object.json_bytes(false), text.as_bytes());
    assert!(object.json_string(true).contains("\n  \"z\": 1"));
}

#[test]
fn test_to_struct() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Owner {
        name: String,
        tags: Vec<String>,
    }

    let owner: Owner = sample_object().get_object("owner").unwrap().to_struct().unwrap();
    assert_eq!(owner.tags, ["admin", "ops"]);

    let err = Object::new().to_struct::<Owner>().unwrap_err();
    assert!(err.is_serialization_error());
}

#[test]
fn test_unmarshal() {
    let mut object = Object::new();

    object.unmarshal("doc", r#"{"a":1}"#);
    object.unmarshal("rows", r#"[{"a":1},{"a":2}]"#);
    object.unmarshal("text", "plain words");
    object.unmarshal("raw", [0xff_u8, 0x00]);
    object.unmarshal("empty", "");

    assert_eq!(object.get_int("doc.a", 0), 1);
    assert_eq!(object.get_int("rows[1].a", 0), 2);
    assert_eq!(object.get_string("text", ""), "plain words");
    assert_eq!(object.get("raw").and_then(Value::as_bytes), Some(&[0xff, 0x00][..]));
    assert!(!object.contains_key("empty"));
}

// ===== MERGING =====

#[test]
fn test_merge_overwrites_non_empty_values() {
    let mut base = sample_object();
    base.merge(&Object::from_json(
        r#"{"version":4,"name":"","owner":{"email":"a@b.c"}}"#,
    ));

    assert_eq!(base.get_int("version", 0), 4);
    assert_eq!(base.get_string("name", ""), "arbor");
    assert_eq!(base.get_string("owner.name", ""), "ada");
    assert_eq!(base.get_string("owner.email", ""), "a@b.c");
}

#[test]
fn test_merge_missing_only_fills_gaps() {
    let mut base = sample_object();
    base.merge_missing(&Object::from_json(r#"{"version":4,"license":"MIT"}"#));

    assert_eq!(base.get_int("version", 0), 3);
    assert_eq!(base.get_string("license", ""), "MIT");
}

#[test]
fn test_remove_nan() {
    let mut object = Object::new()
        .with("bad", f64::NAN)
        .with("list", vec![f64::NAN, 1.0])
        .with("nested.bad", f64::NAN)
        .with("nested.good", 2.0);
    object.insert("record", Record::new("R").with("x", f64::NAN).with("y", 1));

    object.remove_nan();

    assert!(!object.contains_key("bad"));
    assert_eq!(object.get_float_array("list", None), Some(vec![0.0, 1.0]));
    assert!(!object.exists("nested.bad"));
    assert_eq!(object.get_float("nested.good", 0.0), 2.0);
    assert!(!object.exists("record.x"));
    assert_eq!(object.get_int("record.y", 0), 1);
}
