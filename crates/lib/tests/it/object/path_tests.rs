//! Path addressing: reading, writing, deleting and moving by key path.

use arbor::{
    Object, Value,
    constants::{BLANK_STRING, NULL_STRING},
    object::path::KeyPath,
};

use crate::helpers::sample_object;

// ===== READING =====

#[test]
fn test_get_nested_and_indexed_paths() {
    let object = sample_object();

    assert_eq!(object.get("owner.name"), Some(&Value::from("ada")));
    assert_eq!(object.get("owner.tags[1]"), Some(&Value::from("ops")));
    assert_eq!(object.get("servers[1].port"), Some(&Value::Int(8080)));
    assert!(object.get("servers[2].port").is_none());
    assert!(object.get("servers[-1].port").is_none());
    assert!(object.get("name.first").is_none());
    assert!(object.get("missing.path").is_none());
}

#[test]
fn test_stored_null_is_returned_but_does_not_exist() {
    let mut object = Object::new();
    object.set("gone", NULL_STRING);

    assert_eq!(object.get("gone"), Some(&Value::Null));
    assert!(!object.exists("gone"));
    assert_eq!(object.get_string("gone", "fallback"), "fallback");
}

#[test]
fn test_get_path_matches_get() {
    let object = sample_object();
    let path: KeyPath = "servers[0].host".parse().unwrap();

    assert_eq!(path.len(), 2);
    assert_eq!(object.get_path(&path), object.get("servers[0].host"));
}

// ===== WRITING =====

#[test]
fn test_set_then_get() {
    let mut object = Object::new();

    object.set("a.b", "x");
    assert_eq!(object.get("a.b"), Some(&Value::from("x")));

    object.set("a.c", "");
    assert!(object.get("a.c").is_none());

    object.set("a.d", Object::new());
    assert!(object.get("a.d").is_none());

    object.set("a.e", Value::Null);
    assert!(object.get("a.e").is_none());
}

#[test]
fn test_set_sentinels() {
    let mut object = Object::new();

    object.set("blank", BLANK_STRING);
    object.set("null", NULL_STRING);

    assert_eq!(object.get("blank"), Some(&Value::from("")));
    assert_eq!(object.get("null"), Some(&Value::Null));
    assert_eq!(object.len(), 2);
}

#[test]
fn test_set_returns_replaced_value() {
    let mut object = Object::new();

    assert!(object.set("count", 1).is_none());
    assert_eq!(object.set("count", 2), Some(Value::Int(1)));
    assert_eq!(object.get_int("count", 0), 2);
}

#[test]
fn test_set_replaces_scalar_intermediates() {
    let mut object = Object::new().with("a", 5);

    object.set("a.b.c", true);

    assert!(object.get_bool("a.b.c", false));
    assert!(object.get("a").unwrap().is_object());
}

#[test]
fn test_set_through_existing_array_element() {
    let mut object = sample_object();

    object.set("servers[1].port", 9090);
    object.set("owner.tags[0]", "root");

    assert_eq!(object.get_int("servers[1].port", 0), 9090);
    assert_eq!(object.get_string("owner.tags[0]", ""), "root");
}

#[test]
fn test_set_with_unresolvable_index_is_a_no_op() {
    let mut object = sample_object();
    let before = object.clone();

    assert!(object.set("servers[7].port", 1).is_none());
    assert!(object.set("missing[0].x", 1).is_none());

    assert_eq!(object, before);
}

#[test]
fn test_set_if_not_exist() {
    let mut object = sample_object();

    object.set_if_not_exist("name", "other");
    object.set_if_not_exist("license", "MIT");
    object.set_null_if_not_exist("homepage");

    assert_eq!(object.get_string("name", ""), "arbor");
    assert_eq!(object.get_string("license", ""), "MIT");
    assert_eq!(object.get("homepage"), Some(&Value::Null));
}

#[test]
fn test_modify_int() {
    let mut object = Object::new();

    assert_eq!(object.modify_int("stats.hits", 3), 3);
    assert_eq!(object.modify_int("stats.hits", -1), 2);
    assert_eq!(object.get_int("stats.hits", 0), 2);
}

// ===== REMOVAL =====

#[test]
fn test_delete() {
    let mut object = sample_object();

    assert_eq!(object.delete("owner.name"), Some(Value::from("ada")));
    assert!(!object.exists("owner.name"));
    assert!(object.exists("owner.tags"));
    assert!(object.delete("owner.name").is_none());
    assert!(object.delete("nothing.here").is_none());
}

#[test]
fn test_delete_array_element() {
    let mut object = sample_object();

    let removed = object.delete("servers[0]").unwrap();

    assert_eq!(removed.as_object().unwrap().get_string("host", ""), "a.example");
    assert_eq!(object.get_object_array("servers").unwrap().len(), 1);
    assert_eq!(object.get_string("servers[0].host", ""), "b.example");
}

#[test]
fn test_delete_prefix() {
    let mut object = Object::from_json(r#"{"tmp_a":1,"tmp_b":2,"keep":3,"n":{"tmp_c":4}}"#);

    assert_eq!(object.delete_prefix("tmp_"), 2);
    assert_eq!(object.delete_prefix("n.tmp"), 1);
    assert_eq!(object.delete_prefix("missing.tmp"), 0);

    assert_eq!(object.to_string(), r#"{"keep":3,"n":{}}"#);
}

#[test]
fn test_move_path() {
    let mut object = sample_object();

    object.move_path("owner.name", "maintainer.name");
    object.move_path("does.not.exist", "elsewhere");
    object.move_path("version", "version");

    assert!(!object.exists("owner.name"));
    assert_eq!(object.get_string("maintainer.name", ""), "ada");
    assert!(!object.exists("elsewhere"));
    assert_eq!(object.get_int("version", 0), 3);
}
