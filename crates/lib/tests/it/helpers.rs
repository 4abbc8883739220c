use arbor::{Object, Record, Shared, Value};

/// The nested tree most object tests start from.
pub fn sample_object() -> Object {
    Object::from_json(
        r#"{
            "name": "arbor",
            "version": 3,
            "ratio": 0.5,
            "enabled": true,
            "owner": {"name": "ada", "tags": ["admin", "ops"]},
            "servers": [
                {"host": "a.example", "port": 80},
                {"host": "b.example", "port": 8080}
            ]
        }"#,
    )
}

/// A shared object whose `self` key points back at the node itself.
///
/// Call [`break_cycle`] when done so the node is freed.
pub fn self_referencing_node() -> Shared {
    let node = Shared::new(Object::new().with("label", "loop"));
    if let Value::Object(object) = &mut *node.borrow_mut() {
        object.insert("self", node.clone());
    }
    node
}

pub fn break_cycle(node: &Shared) {
    node.replace(Value::Null);
}

/// Returns the shared node stored under the literal `key`.
pub fn shared_field(object: &Object, key: &str) -> Shared {
    match object.field(key) {
        Some(Value::Shared(shared)) => shared.clone(),
        other => panic!("expected a shared node at '{key}', got: {other:?}"),
    }
}

pub fn account_record() -> Record {
    Record::new("Account")
        .with("Name", "alice")
        .with_tagged("Email", "", arbor::FieldTag::parse("email,omitempty"))
        .with_tagged("Score", 12, arbor::FieldTag::parse("score"))
        .with_tagged("Internal", 1, arbor::FieldTag::parse("-"))
        .with_private("password", "hunter2")
}
