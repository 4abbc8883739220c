//! Dynamic JSON-like objects addressed by key paths.
//!
//! [`Object`] is an insertion-ordered map from string keys to [`Value`]s.
//! Besides plain map access it offers path addressing (`a.b[2].c`, see
//! [`path`]), typed getters that fall back to a default instead of failing,
//! flattening and diffing (see [`flatten`]) and deep copies.
//!
//! # Writing
//!
//! [`Object::set`] compacts: null, the empty string and the empty object
//! are never stored. Two sentinels override that:
//! [`BLANK_STRING`] stores an explicit empty string and [`NULL_STRING`]
//! stores an explicit null.
//!
//! ```
//! # use arbor::Object;
//! # use arbor::constants::BLANK_STRING;
//! let mut object = Object::new();
//! object.set("user.name", "ada");
//! object.set("user.nick", "");
//! object.set("user.title", BLANK_STRING);
//!
//! assert_eq!(object.get_string("user.name", ""), "ada");
//! assert!(!object.exists("user.nick"));
//! assert_eq!(object.get("user.title").and_then(|v| v.as_str()), Some(""));
//! ```
//!
//! # Reading
//!
//! Reads never fail. A missing key, an index out of range or an
//! intermediate segment that is not an object all read as absent, and the
//! typed getters return the caller's default. A stored null is returned by
//! [`Object::get`] but counts as absent everywhere else.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    Value, coerce,
    constants::{BLANK_STRING, NULL_STRING, PATH_SEPARATOR},
    deepcopy,
    value::equal,
};

mod convert;
pub mod flatten;
mod merge;
pub mod path;

pub use convert::IntoObject;
pub use flatten::{FieldDiff, ObjectDiff};
use path::{KeyPath, Segment};

/// An insertion-ordered map from string keys to [`Value`]s.
#[derive(Debug, Clone, Default)]
pub struct Object {
    fields: IndexMap<String, Value>,
}

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets `path` to `value` (builder style)
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.set(path, value);
        self
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ===== Raw key access =====

    /// Returns the value stored under the literal key `key`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Stores `value` under the literal key `key`, bypassing compaction.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes the literal key `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Value> {
        self.fields.iter_mut()
    }

    pub fn retain(&mut self, keep: impl FnMut(&String, &mut Value) -> bool) {
        self.fields.retain(keep);
    }

    // ===== Path resolution =====

    fn object_at(&self, segments: &[Segment]) -> Option<&Object> {
        let mut current = self;
        for segment in segments {
            current = current.step(segment)?.as_object()?;
        }
        Some(current)
    }

    fn object_at_mut(&mut self, segments: &[Segment]) -> Option<&mut Object> {
        let mut current = self;
        for segment in segments {
            current = current.step_mut(segment)?.as_object_mut()?;
        }
        Some(current)
    }

    fn step(&self, segment: &Segment) -> Option<&Value> {
        let value = self.fields.get(segment.key())?;
        if segment.index().is_none() {
            return Some(value);
        }
        let items = value.as_array()?;
        items.get(segment.position(items.len())?)
    }

    fn step_mut(&mut self, segment: &Segment) -> Option<&mut Value> {
        let value = self.fields.get_mut(segment.key())?;
        if segment.index().is_none() {
            return Some(value);
        }
        let items = value.as_array_mut()?;
        let position = segment.position(items.len())?;
        items.get_mut(position)
    }

    /// Resolves a parsed key path.
    pub fn get_path(&self, path: &KeyPath) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        self.object_at(parents)?.step(last)
    }

    pub fn get_path_mut(&mut self, path: &KeyPath) -> Option<&mut Value> {
        let (last, parents) = path.split_last()?;
        self.object_at_mut(parents)?.step_mut(last)
    }

    /// Resolves a key path.
    ///
    /// Traversal descends through objects and through array elements that
    /// are objects. It yields `None` as soon as a segment is missing, an
    /// index is out of range or an intermediate value is not an object.
    /// The final value is returned as stored, including an explicit null.
    ///
    /// ```
    /// # use arbor::Object;
    /// let object = Object::from_json(r#"{"a":{"b":[{"c":1},{"c":2}]}}"#);
    /// assert_eq!(object.get("a.b[1].c").and_then(|v| v.as_int()), Some(2));
    /// assert!(object.get("a.b[5].c").is_none());
    /// assert!(object.get("a.b.c").is_none());
    /// ```
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_path(&KeyPath::parse(path))
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Value> {
        self.get_path_mut(&KeyPath::parse(path))
    }

    /// Like [`get`](Self::get) but treats an explicit null as absent.
    fn present(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|value| !value.is_null())
    }

    /// True if `path` resolves to a value that is not null.
    ///
    /// A key explicitly set to null does not exist by this definition.
    pub fn exists(&self, path: &str) -> bool {
        self.present(path).is_some()
    }

    // ===== Writing =====

    /// Writes `value` at `path`, returning the value it replaced.
    ///
    /// Null, the empty string and the empty object are not written.
    /// [`BLANK_STRING`] writes an empty string and [`NULL_STRING`] writes
    /// null. Missing intermediate objects are created and intermediate
    /// values that are not objects are replaced by empty objects. Indexed
    /// segments only address existing array elements; if one does not
    /// resolve, nothing is written.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Option<Value> {
        let value = match value.into() {
            Value::Null => return None,
            Value::String(s) if s.is_empty() => return None,
            Value::Object(object) if object.is_empty() => return None,
            Value::String(s) if s == BLANK_STRING => Value::String(String::new()),
            Value::String(s) if s == NULL_STRING => Value::Null,
            value => value,
        };
        self.set_path(&KeyPath::parse(path), value)
    }

    /// Writes `value` at a parsed path without compaction or sentinels.
    pub fn set_path(&mut self, path: &KeyPath, value: Value) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            let Some(next) = current.descend_or_create(segment) else {
                debug!(%path, %segment, "index does not address an array element, write skipped");
                return None;
            };
            current = next;
        }
        if last.index().is_none() {
            return current.fields.insert(last.key().to_string(), value);
        }
        match current.step_mut(last) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                debug!(%path, "index does not address an array element, write skipped");
                None
            }
        }
    }

    fn descend_or_create(&mut self, segment: &Segment) -> Option<&mut Object> {
        let slot = match segment.index() {
            None => self
                .fields
                .entry(segment.key().to_string())
                .or_insert_with(|| Value::Object(Object::new())),
            Some(_) => self.step_mut(segment)?,
        };
        if !slot.is_object() {
            debug!(%segment, kind = %slot.kind(), "replacing non-object intermediate with an empty object");
            *slot = Value::Object(Object::new());
        }
        slot.as_object_mut()
    }

    /// Writes `value` only if `path` does not exist.
    pub fn set_if_not_exist(&mut self, path: &str, value: impl Into<Value>) {
        if !self.exists(path) {
            self.set(path, value);
        }
    }

    /// Writes an explicit null if `path` does not exist.
    pub fn set_null_if_not_exist(&mut self, path: &str) {
        self.set_if_not_exist(path, NULL_STRING);
    }

    /// Adds `delta` to the integer at `path` and returns the new value.
    ///
    /// A missing value counts as zero.
    pub fn modify_int(&mut self, path: &str, delta: i64) -> i64 {
        let updated = self.get_int(path, 0).wrapping_add(delta);
        self.set(path, updated);
        updated
    }

    // ===== Removal =====

    /// Removes the value at `path` and returns it.
    ///
    /// An indexed final segment removes that element from its array.
    pub fn delete(&mut self, path: &str) -> Option<Value> {
        let path = KeyPath::parse(path);
        let (last, parents) = path.split_last()?;
        let parent = self.object_at_mut(parents)?;
        if last.index().is_none() {
            return parent.fields.shift_remove(last.key());
        }
        let items = parent.fields.get_mut(last.key())?.as_array_mut()?;
        let position = last.position(items.len())?;
        Some(items.remove(position))
    }

    /// Removes every key of the addressed parent that starts with the last
    /// segment of `prefix`, returning how many were removed.
    ///
    /// Matching is by raw string prefix, so `"ab"` also removes `"abcd"`.
    /// Without a dot the parent is this object.
    ///
    /// ```
    /// # use arbor::Object;
    /// let mut object = Object::from_json(r#"{"n":{"ab":1,"abcd":2,"b":3},"ab":4}"#);
    /// assert_eq!(object.delete_prefix("n.ab"), 2);
    /// assert!(object.exists("n.b"));
    /// assert!(object.exists("ab"));
    /// ```
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let (parent, key_prefix) = match prefix.rsplit_once(PATH_SEPARATOR) {
            Some((parent_path, key_prefix)) => match self.get_object_mut(parent_path) {
                Some(parent) => (parent, key_prefix),
                None => return 0,
            },
            None => (self, prefix),
        };
        let before = parent.len();
        parent.fields.retain(|key, _| !key.starts_with(key_prefix));
        before - parent.len()
    }

    /// Moves the value at `from` to `to`.
    ///
    /// Nothing happens when the paths are equal or `from` is absent or null.
    pub fn move_path(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        let Some(value) = self.present(from).cloned() else {
            return;
        };
        self.set(to, value);
        self.delete(from);
    }

    // ===== Typed getters =====

    pub fn get_string(&self, path: &str, default: &str) -> String {
        self.present(path)
            .map_or_else(|| default.to_string(), coerce::to_string)
    }

    pub fn get_int(&self, path: &str, default: i64) -> i64 {
        self.present(path).map_or(default, coerce::to_int)
    }

    pub fn get_float(&self, path: &str, default: f64) -> f64 {
        self.present(path).map_or(default, coerce::to_float)
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.present(path).map_or(default, coerce::to_bool)
    }

    pub fn get_time(&self, path: &str, default: DateTime<Utc>) -> DateTime<Utc> {
        self.present(path).map_or(default, coerce::to_time)
    }

    pub fn get_string_opt(&self, path: &str) -> Option<String> {
        self.present(path).map(coerce::to_string)
    }

    pub fn get_int_opt(&self, path: &str) -> Option<i64> {
        self.present(path).map(coerce::to_int)
    }

    pub fn get_float_opt(&self, path: &str) -> Option<f64> {
        self.present(path).map(coerce::to_float)
    }

    pub fn get_bool_opt(&self, path: &str) -> Option<bool> {
        self.present(path).map(coerce::to_bool)
    }

    pub fn get_time_opt(&self, path: &str) -> Option<DateTime<Utc>> {
        self.present(path).map(coerce::to_time)
    }

    /// Returns the nested object at `path`.
    pub fn get_object(&self, path: &str) -> Option<&Object> {
        self.get(path)?.as_object()
    }

    pub fn get_object_mut(&mut self, path: &str) -> Option<&mut Object> {
        self.get_mut(path)?.as_object_mut()
    }

    /// Returns the array at `path` as objects.
    ///
    /// Elements are normalized through [`IntoObject`]; elements that are
    /// not object-shaped become empty objects.
    pub fn get_object_array(&self, path: &str) -> Option<Vec<Object>> {
        let items = self.present(path)?.as_array()?;
        Some(items.iter().map(|item| item.clone().into_object()).collect())
    }

    /// Returns the value at `path` as strings.
    ///
    /// A lone string becomes a one-element array. `default` is returned
    /// only when the path is absent.
    pub fn get_string_array(&self, path: &str, default: Option<Vec<String>>) -> Option<Vec<String>> {
        match self.present(path) {
            Some(value) => coerce::to_string_array(value),
            None => default,
        }
    }

    pub fn get_float_array(&self, path: &str, default: Option<Vec<f64>>) -> Option<Vec<f64>> {
        match self.present(path) {
            Some(value) => coerce::to_float_array(value),
            None => default,
        }
    }

    /// Returns the value at `path` as bytes.
    ///
    /// Strings yield their UTF-8 bytes and anything else its JSON text.
    pub fn get_bytes(&self, path: &str, default: Option<Vec<u8>>) -> Option<Vec<u8>> {
        match self.present(path) {
            Some(Value::Bytes(bytes)) => Some(bytes.clone()),
            Some(Value::String(s)) => Some(s.clone().into_bytes()),
            Some(value) => Some(serde_json::to_vec(value).unwrap_or_default()),
            None => default,
        }
    }

    /// Decodes the value at `path` into `T` through its JSON form.
    pub fn get_into<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.present(path)?;
        let decoded = serde_json::to_value(value).and_then(serde_json::from_value::<T>);
        match decoded {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                debug!(path, %error, "value does not decode into the requested type");
                None
            }
        }
    }

    // ===== Whole-tree operations =====

    /// Counts the leaves of the tree. Empty arrays and objects count as none.
    pub fn field_count(&self) -> usize {
        fn leaves(value: &Value) -> usize {
            match value {
                Value::Object(object) => object.field_count(),
                Value::Array(items) => items.iter().map(leaves).sum(),
                _ => 1,
            }
        }
        self.values().map(leaves).sum()
    }

    /// Stores raw text in the literal key `field`.
    ///
    /// Text starting with `{` or `[` is parsed as a JSON object or an array
    /// of objects. Otherwise printable UTF-8 is stored as a string and
    /// anything else as bytes. Empty input is ignored.
    pub fn unmarshal(&mut self, field: &str, raw: impl AsRef<[u8]>) {
        let raw = raw.as_ref();
        let parsed = match raw.first() {
            None => return,
            Some(b'{') => serde_json::from_slice::<Object>(raw).ok().map(Value::Object),
            Some(b'[') => serde_json::from_slice::<Vec<Object>>(raw).ok().map(Value::from),
            Some(_) => None,
        };
        let value = parsed.unwrap_or_else(|| match std::str::from_utf8(raw) {
            Ok(text) if !text.chars().any(char::is_control) => Value::from(text),
            _ => Value::from(raw),
        });
        self.insert(field, value);
    }

    /// Copies the tree so that it shares no mutable node with `self`.
    ///
    /// Shared nodes are copied once and stay shared between their copies.
    pub fn try_deep_copy(&self) -> Result<Object, deepcopy::CopyError> {
        deepcopy::try_deepcopy(self)
    }

    /// Lenient [`try_deep_copy`](Self::try_deep_copy).
    ///
    /// A tree holding a value that cannot be copied falls back to a
    /// structural clone.
    pub fn deep_copy(&self) -> Object {
        self.try_deep_copy().unwrap_or_else(|error| {
            warn!(%error, "deep copy failed, falling back to a structural clone");
            self.clone()
        })
    }

    /// Decodes the whole tree into `T` through its JSON form.
    pub fn to_struct<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }

    /// Renders the tree as JSON text, empty if it cannot be serialized.
    pub fn json_string(&self, pretty: bool) -> String {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.unwrap_or_else(|error| {
            warn!(%error, "object could not be rendered as JSON");
            String::new()
        })
    }

    pub fn json_bytes(&self, pretty: bool) -> Vec<u8> {
        self.json_string(pretty).into_bytes()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        equal::objects_equal(self, other)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.json_string(false))
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Extend<(String, Value)> for Object {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}
