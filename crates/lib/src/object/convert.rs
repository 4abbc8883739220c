//! Building objects from loosely typed input.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::Object;
use crate::coerce;
use crate::value::{Record, Value};

/// Input that can be normalized into an [`Object`].
///
/// Objects and maps are deep-copied so the result shares nothing mutable
/// with the input, then their records are normalized. Text and bytes are
/// parsed as JSON, falling back to an empty object. Records go through
/// [`crate::normalize`]. Values dispatch on their kind; scalars become an
/// empty object.
pub trait IntoObject {
    fn into_object(self) -> Object;
}

impl Object {
    /// Normalizes any supported input into an object.
    ///
    /// ```
    /// # use arbor::{Object, Record};
    /// let from_text = Object::normalized(r#"{"a":1}"#);
    /// let from_record = Object::normalized(Record::new("T").with("a", 1));
    /// assert_eq!(from_text, from_record);
    /// assert!(Object::normalized("not json").is_empty());
    /// ```
    pub fn normalized(input: impl IntoObject) -> Object {
        input.into_object()
    }

    /// Parses JSON text, returning an empty object when it is not a JSON object.
    pub fn from_json(text: impl AsRef<[u8]>) -> Object {
        Self::try_from_json(text).unwrap_or_else(|error| {
            debug!(%error, "input is not a JSON object, using an empty object");
            Object::new()
        })
    }

    pub fn try_from_json(text: impl AsRef<[u8]>) -> crate::Result<Object> {
        Ok(serde_json::from_slice(text.as_ref())?)
    }

    /// Converts any serializable value that serializes as a map.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> crate::Result<Object> {
        match Value::from(serde_json::to_value(value)?) {
            Value::Object(object) => Ok(object),
            other => Err(crate::Error::NotAnObject { kind: other.kind() }),
        }
    }

    /// Replaces record leaves by their normalized objects and identifier
    /// leaves by their hex form, throughout the object and array nodes of
    /// the tree. Shared nodes are left alone.
    pub fn normalize_records(&mut self) {
        for (_, value) in self.iter_mut() {
            normalize_in_place(value);
        }
    }
}

fn normalize_in_place(value: &mut Value) {
    match value {
        Value::Object(object) => object.normalize_records(),
        Value::Array(items) => items.iter_mut().for_each(normalize_in_place),
        Value::Record(record) => {
            let object = record.to_object();
            *value = Value::Object(object);
        }
        Value::Foreign(foreign) => {
            if let Some(hex) = foreign.hex() {
                *value = Value::String(hex);
            }
        }
        _ => {}
    }
}

fn copy_and_normalize(object: &Object) -> Object {
    let mut copy = object.deep_copy();
    copy.normalize_records();
    copy
}

impl IntoObject for Object {
    fn into_object(self) -> Object {
        copy_and_normalize(&self)
    }
}

impl IntoObject for &Object {
    fn into_object(self) -> Object {
        copy_and_normalize(self)
    }
}

impl IntoObject for IndexMap<String, Value> {
    fn into_object(self) -> Object {
        copy_and_normalize(&self.into_iter().collect())
    }
}

impl IntoObject for HashMap<String, Value> {
    fn into_object(self) -> Object {
        copy_and_normalize(&self.into_iter().collect())
    }
}

impl IntoObject for BTreeMap<String, Value> {
    fn into_object(self) -> Object {
        copy_and_normalize(&self.into_iter().collect())
    }
}

impl IntoObject for &str {
    fn into_object(self) -> Object {
        Object::from_json(self)
    }
}

impl IntoObject for String {
    fn into_object(self) -> Object {
        Object::from_json(self)
    }
}

impl IntoObject for &[u8] {
    fn into_object(self) -> Object {
        Object::from_json(self)
    }
}

impl IntoObject for Vec<u8> {
    fn into_object(self) -> Object {
        Object::from_json(self)
    }
}

impl IntoObject for Record {
    fn into_object(self) -> Object {
        self.to_object()
    }
}

impl IntoObject for &Record {
    fn into_object(self) -> Object {
        self.to_object()
    }
}

impl IntoObject for serde_json::Value {
    fn into_object(self) -> Object {
        Value::from(self).into_object()
    }
}

impl IntoObject for Value {
    fn into_object(self) -> Object {
        match self {
            Value::Object(object) => object.into_object(),
            Value::Record(record) => record.to_object(),
            Value::String(text) => Object::from_json(text),
            Value::Bytes(bytes) => Object::from_json(bytes),
            Value::Shared(_) => {
                coerce::with_resolved(&self, Object::new, |value| value.clone().into_object())
            }
            _ => Object::new(),
        }
    }
}
