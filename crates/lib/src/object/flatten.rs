//! Flattening and structural diffs.
//!
//! [`Object::flatten`] projects a tree onto a single level: nested keys are
//! joined with a delimiter and array elements are addressed as `key[i]`.
//! Diffs are computed over the flattened form of both trees, so every
//! changed leaf is reported under its full path.
//!
//! ```
//! # use arbor::Object;
//! let old = Object::from_json(r#"{"a":"abc","b":456,"c":{"d":123}}"#);
//! let new = Object::from_json(r#"{"a":"abc","c":{"d":555,"e":{"g":789}}}"#);
//!
//! let diff = old.diff(&new);
//! assert!(!diff.same);
//! assert_eq!(diff.added.get_int("c/e/g", 0), 789);
//! assert_eq!(diff.deleted.get_int("b", 0), 456);
//! assert_eq!(diff.modified["c/d"].old, 123);
//! assert_eq!(diff.modified["c/d"].new, 555);
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use super::Object;
use crate::{Value, constants::DIFF_DELIMITER};

impl Object {
    /// Flattens the tree into a single-level object.
    ///
    /// Nested object keys are joined with `delimiter`. Array elements are
    /// keyed `key[i]`; object elements are flattened further under that key.
    /// Every other value, including bytes, shared nodes and records, is a
    /// leaf. Empty objects and arrays leave no key behind.
    pub fn flatten(&self, delimiter: &str) -> Object {
        let mut flat = Object::new();
        flatten_into(self, "", delimiter, &mut flat);
        flat
    }

    /// Compares this tree (old) against `other` (new).
    pub fn diff(&self, other: &Object) -> ObjectDiff {
        ObjectDiff::between(Some(self), Some(other))
    }
}

fn flatten_into(object: &Object, prefix: &str, delimiter: &str, flat: &mut Object) {
    for (key, value) in object {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{delimiter}{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &key, delimiter, flat),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    let indexed = format!("{key}[{i}]");
                    match item {
                        Value::Object(nested) => flatten_into(nested, &indexed, delimiter, flat),
                        _ => {
                            flat.insert(indexed, item.clone());
                        }
                    }
                }
            }
            _ => {
                flat.insert(key, value.clone());
            }
        }
    }
}

/// Old and new value of a modified leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub old: Value,
    pub new: Value,
}

/// Result of comparing two trees over their flattened keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ObjectDiff {
    /// True iff nothing was added, modified or deleted
    pub same: bool,
    /// Leaves only present in the new tree
    #[serde(skip_serializing_if = "Object::is_empty")]
    pub added: Object,
    /// Leaves present in both trees with different values
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modified: IndexMap<String, FieldDiff>,
    /// Leaves only present in the old tree
    #[serde(skip_serializing_if = "Object::is_empty")]
    pub deleted: Object,
}

impl ObjectDiff {
    /// Compares two optional trees.
    ///
    /// Two missing trees are the same. When exactly one is missing the
    /// result is not the same but reports no individual changes.
    pub fn between(old: Option<&Object>, new: Option<&Object>) -> ObjectDiff {
        match (old, new) {
            (None, None) => ObjectDiff {
                same: true,
                ..ObjectDiff::default()
            },
            (Some(old), Some(new)) => compare(
                &old.flatten(DIFF_DELIMITER),
                &new.flatten(DIFF_DELIMITER),
            ),
            _ => ObjectDiff::default(),
        }
    }

    /// Total number of reported changes
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compares two optional trees, see [`ObjectDiff::between`].
pub fn diff(old: Option<&Object>, new: Option<&Object>) -> ObjectDiff {
    ObjectDiff::between(old, new)
}

fn compare(old: &Object, new: &Object) -> ObjectDiff {
    let mut diff = ObjectDiff::default();
    for (key, old_value) in old {
        match new.field(key) {
            Some(new_value) if new_value != old_value => {
                diff.modified.insert(
                    key.clone(),
                    FieldDiff {
                        old: old_value.clone(),
                        new: new_value.clone(),
                    },
                );
            }
            Some(_) => {}
            None => {
                diff.deleted.insert(key.clone(), old_value.clone());
            }
        }
    }
    for (key, new_value) in new {
        if !old.contains_key(key) {
            diff.added.insert(key.clone(), new_value.clone());
        }
    }
    diff.same = diff.is_empty();
    diff
}
