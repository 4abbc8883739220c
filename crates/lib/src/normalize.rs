//! Struct normalization: turning foreign records into plain trees.
//!
//! A [`Record`] normalizes into an [`Object`] keyed by its fields'
//! serialized names:
//!
//! - private fields and fields tagged `skip` are dropped
//! - fields tagged `omit_empty` are dropped when their value is empty
//! - times and bytes pass through unchanged
//! - identifiers become their hex string
//! - nested records, arrays and objects are normalized recursively
//! - shared nodes are replaced by their normalized content
//!
//! A shared node that leads back to itself normalizes to null at the point
//! where the cycle closes.

use std::collections::HashSet;

use tracing::warn;

use crate::Object;
use crate::value::{Record, Shared, Value};

/// Normalizes a value, see the [module documentation](self).
pub fn normalize(value: &Value) -> Value {
    Normalizer::default().value(value)
}

/// Normalizes a record into an object.
pub fn record_to_object(record: &Record) -> Object {
    Normalizer::default().record(record)
}

#[derive(Default)]
struct Normalizer {
    /// Shared nodes currently being expanded
    expanding: HashSet<usize>,
}

impl Normalizer {
    fn value(&mut self, value: &Value) -> Value {
        match value {
            Value::Record(record) => Value::Object(self.record(record)),
            Value::Foreign(foreign) => foreign.hex().map_or_else(|| value.clone(), Value::String),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.value(item)).collect()),
            Value::Object(object) => Value::Object(self.object(object)),
            Value::Shared(shared) => self.shared(shared),
            _ => value.clone(),
        }
    }

    fn object(&mut self, object: &Object) -> Object {
        object
            .iter()
            .map(|(key, value)| (key.clone(), self.value(value)))
            .collect()
    }

    fn record(&mut self, record: &Record) -> Object {
        let mut object = Object::with_capacity(record.fields().len());
        for field in record.fields() {
            if !field.is_public() || field.tag.skip {
                continue;
            }
            if field.tag.omit_empty && field.value.is_empty() {
                continue;
            }
            object.insert(field.serialized_name(), self.value(&field.value));
        }
        object
    }

    fn shared(&mut self, shared: &Shared) -> Value {
        let addr = shared.addr();
        if !self.expanding.insert(addr) {
            warn!(addr, "shared node refers back to itself, normalized to null");
            return Value::Null;
        }
        let normalized = match shared.try_borrow() {
            Ok(inner) => self.value(&inner),
            Err(_) => {
                warn!(addr, "shared node is mutably borrowed, normalized to null");
                Value::Null
            }
        };
        self.expanding.remove(&addr);
        normalized
    }
}
