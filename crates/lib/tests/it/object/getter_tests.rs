//! Typed getters and whole-tree queries.

use arbor::{Object, Value, coerce::zero_time};
use chrono::{TimeZone, Utc};
use serde::Deserialize;

use crate::helpers::sample_object;

#[test]
fn test_typed_getters_coerce() {
    let object = sample_object();

    assert_eq!(object.get_string("version", ""), "3");
    assert_eq!(object.get_int("ratio", -1), 0);
    assert_eq!(object.get_float("version", 0.0), 3.0);
    assert!(object.get_bool("enabled", false));
    assert_eq!(object.get_string("servers[0].port", ""), "80");
}

#[test]
fn test_typed_getters_fall_back_to_default() {
    let object = sample_object();

    assert_eq!(object.get_string("nope", "dflt"), "dflt");
    assert_eq!(object.get_int("nope", 7), 7);
    assert_eq!(object.get_float("nope", 1.5), 1.5);
    assert!(object.get_bool("nope", true));
    assert_eq!(object.get_time("nope", zero_time()), zero_time());
    assert!(object.get_int_opt("nope").is_none());
}

#[test]
fn test_unparsable_values_are_zero_not_default() {
    let object = Object::new().with("word", "abc");

    assert_eq!(object.get_int("word", 9), 0);
    assert!(object.get_float("word", 9.0).is_nan());
    assert!(!object.get_bool("word", true));
    assert_eq!(object.get_time("word", Utc::now()), zero_time());
}

#[test]
fn test_get_time() {
    let when = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    let object = Object::new()
        .with("stored", when)
        .with("text", "2024-05-06T07:08:09Z")
        .with("unix", when.timestamp());

    assert_eq!(object.get_time("stored", zero_time()), when);
    assert_eq!(object.get_time("text", zero_time()), when);
    assert_eq!(object.get_time("unix", zero_time()), when);
}

#[test]
fn test_array_getters() {
    let object = sample_object().with("single", "x").with("weights", vec![1.0, 2.5]);

    assert_eq!(
        object.get_string_array("owner.tags", None),
        Some(vec!["admin".to_string(), "ops".to_string()])
    );
    assert_eq!(object.get_string_array("single", None), Some(vec!["x".to_string()]));
    assert_eq!(object.get_string_array("nope", Some(vec![])), Some(vec![]));
    assert_eq!(object.get_float_array("weights", None), Some(vec![1.0, 2.5]));

    let servers = object.get_object_array("servers").unwrap();
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[1].get_int("port", 0), 8080);
}

#[test]
fn test_get_object_and_bytes() {
    let mut object = sample_object();

    assert_eq!(object.get_object("owner").unwrap().get_string("name", ""), "ada");
    assert!(object.get_object("name").is_none());

    object.get_object_mut("owner").unwrap().insert("id", 1);
    assert_eq!(object.get_int("owner.id", 0), 1);

    assert_eq!(object.get_bytes("name", None), Some(b"arbor".to_vec()));
    assert_eq!(object.get_bytes("owner.tags", None), Some(br#"["admin","ops"]"#.to_vec()));
}

#[test]
fn test_get_into() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        host: String,
        port: u16,
    }

    let object = sample_object();
    let server: Option<Server> = object.get_into("servers[1]");
    assert_eq!(
        server,
        Some(Server {
            host: "b.example".to_string(),
            port: 8080
        })
    );
    assert!(object.get_into::<Server>("owner").is_none());
}

#[test]
fn test_field_count() {
    let object = sample_object();
    // name, version, ratio, enabled, owner.name, 2 tags, 2 x (host, port)
    assert_eq!(object.field_count(), 11);
    assert_eq!(Object::new().field_count(), 0);
}

#[test]
fn test_values_compare_with_primitives() {
    let object = sample_object();

    assert!(*object.get("name").unwrap() == "arbor");
    assert!(*object.get("version").unwrap() == 3);
    assert!(*object.get("enabled").unwrap() == true);
    assert!(*object.get("version").unwrap() != Value::Float(3.0));
}
