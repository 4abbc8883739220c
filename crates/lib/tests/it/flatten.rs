//! Flattening and structural diff tests.

use arbor::{Object, Shared, Value, diff};

use crate::helpers::sample_object;

// ===== FLATTEN =====

#[test]
fn test_flatten_nested_objects() {
    let object = Object::from_json(r#"{"a":"abc","b":456,"c":{"d":123,"e":{"f":456}}}"#);
    let flat = object.flatten(".");

    assert_eq!(flat.len(), 4);
    assert_eq!(flat.field("c.e.f"), Some(&Value::Int(456)));
    assert_eq!(flat.field("a"), Some(&Value::from("abc")));
}

#[test]
fn test_flatten_leaf_matches_get() {
    let object = Object::from_json(
        r#"{"x":{"y":{"z":true,"w":"s"},"v":1.25},"u":null,"t":"top"}"#,
    );
    let flat = object.flatten(".");

    for (key, value) in &flat {
        assert_eq!(object.get(key), Some(value), "leaf {key} differs");
    }
    assert_eq!(flat.len(), 5);
}

#[test]
fn test_flatten_arrays_use_bracketed_keys() {
    let flat = sample_object().flatten(".");

    assert_eq!(flat.field("owner.tags[1]"), Some(&Value::from("ops")));
    assert_eq!(flat.field("servers[0].host"), Some(&Value::from("a.example")));
    assert_eq!(flat.field("servers[1].port"), Some(&Value::Int(8080)));
    assert!(!flat.contains_key("servers"));
}

#[test]
fn test_flatten_keeps_shared_nodes_as_leaves() {
    let shared = Shared::new(Object::new().with("inner", 1));
    let mut object = Object::new();
    object.insert("node", shared.clone());

    let flat = object.flatten(".");

    assert!(!flat.contains_key("node.inner"));
    match flat.field("node") {
        Some(Value::Shared(leaf)) => assert!(leaf.ptr_eq(&shared)),
        other => panic!("expected the shared node as a leaf, got: {other:?}"),
    }
}

// ===== DIFF =====

#[test]
fn test_diff_reports_added_modified_deleted() {
    let old = Object::from_json(r#"{"a":"abc","b":456,"c":{"d":123}}"#);
    let new = Object::from_json(r#"{"a":"abc","c":{"d":555,"e":{"g":789}}}"#);

    let diff = old.diff(&new);

    assert!(!diff.same);
    assert_eq!(diff.added.to_string(), r#"{"c/e/g":789}"#);
    assert_eq!(diff.deleted.to_string(), r#"{"b":456}"#);
    assert_eq!(diff.modified.len(), 1);
    assert_eq!(diff.modified["c/d"].old, Value::Int(123));
    assert_eq!(diff.modified["c/d"].new, Value::Int(555));
    assert_eq!(diff.len(), 3);
}

#[test]
fn test_diff_with_itself_is_same() {
    let object = sample_object();

    let diff = object.diff(&object.clone());

    assert!(diff.same);
    assert!(diff.added.is_empty());
    assert!(diff.modified.is_empty());
    assert!(diff.deleted.is_empty());
}

#[test]
fn test_diff_nil_trees() {
    let object = sample_object();

    let both = diff(None, None);
    assert!(both.same);
    assert!(both.is_empty());

    for one_sided in [diff(Some(&object), None), diff(None, Some(&object))] {
        assert!(!one_sided.same);
        assert!(one_sided.added.is_empty());
        assert!(one_sided.modified.is_empty());
        assert!(one_sided.deleted.is_empty());
    }
}

#[test]
fn test_diff_compares_values_deeply() {
    let old = Object::from_json(r#"{"n":1,"f":1.0,"list":[1,2]}"#);
    let new = Object::from_json(r#"{"n":1,"f":1.0,"list":[1,3]}"#);

    let diff = old.diff(&new);

    assert_eq!(diff.modified.keys().collect::<Vec<_>>(), ["list[1]"]);
}

#[test]
fn test_diff_distinguishes_int_and_float() {
    let old = Object::new().with("n", 1);
    let new = Object::new().with("n", 1.0);

    assert!(old.diff(&new).modified.contains_key("n"));
}
