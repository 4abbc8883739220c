//! Merging trees and scrubbing NaN values.

use tracing::warn;

use super::Object;
use crate::{Value, deepcopy};

impl Object {
    /// Deep-merges `other` into this object.
    ///
    /// Nested objects merge recursively; any other non-empty value from
    /// `other` overwrites what is here. Empty values in `other` (see
    /// [`Value::is_empty`]) never overwrite.
    ///
    /// ```
    /// # use arbor::Object;
    /// let mut base = Object::from_json(r#"{"a":1,"n":{"x":1,"y":2}}"#);
    /// base.merge(&Object::from_json(r#"{"a":0,"n":{"y":3,"z":4}}"#));
    /// assert_eq!(base.to_string(), r#"{"a":1,"n":{"x":1,"y":3,"z":4}}"#);
    /// ```
    pub fn merge(&mut self, other: &Object) {
        merge_objects(self, other, true);
    }

    /// Deep-merges `other`, only filling keys that are missing or empty here.
    pub fn merge_missing(&mut self, other: &Object) {
        merge_objects(self, other, false);
    }

    /// Drops keys holding NaN and replaces NaN array elements with `0.0`,
    /// throughout the tree. Records are normalized first.
    pub fn remove_nan(&mut self) {
        self.normalize_records();
        strip_nan(self);
    }
}

fn merge_objects(target: &mut Object, source: &Object, overwrite: bool) {
    for (key, incoming) in source {
        if incoming.is_empty() {
            continue;
        }
        let Some(existing) = target.field_mut(key) else {
            target.insert(key.clone(), copy_value(incoming));
            continue;
        };
        match (existing, incoming) {
            (Value::Object(existing), Value::Object(incoming)) => {
                merge_objects(existing, incoming, overwrite)
            }
            (existing, incoming) => {
                if overwrite || existing.is_empty() {
                    *existing = copy_value(incoming);
                }
            }
        }
    }
}

fn copy_value(value: &Value) -> Value {
    deepcopy::try_deepcopy(value).unwrap_or_else(|error| {
        warn!(%error, "merged value could not be deep-copied, cloning instead");
        value.clone()
    })
}

fn is_nan(value: &Value) -> bool {
    matches!(value, Value::Float(x) if x.is_nan())
}

fn strip_nan(object: &mut Object) {
    object.retain(|_, value| !is_nan(value));
    for (_, value) in object.iter_mut() {
        strip_nan_value(value);
    }
}

fn strip_nan_value(value: &mut Value) {
    match value {
        Value::Object(object) => strip_nan(object),
        Value::Array(items) => {
            for item in items.iter_mut() {
                if is_nan(item) {
                    *item = Value::Float(0.0);
                } else {
                    strip_nan_value(item);
                }
            }
        }
        _ => {}
    }
}
