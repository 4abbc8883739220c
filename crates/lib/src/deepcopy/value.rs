//! [`DeepCopy`] for the dynamic value model.

use super::{CopyError, CycleTable, DeepCopy};
use crate::{Foreign, Object, Record, Shared, Value, value::RecordField};

impl DeepCopy for Value {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        Ok(match self {
            Value::Array(items) => Value::Array(items.deep_copy(table)?),
            Value::Object(object) => Value::Object(DeepCopy::deep_copy(object, table)?),
            Value::Shared(shared) => Value::Shared(shared.deep_copy(table)?),
            Value::Record(record) => Value::Record(record.deep_copy(table)?),
            Value::Foreign(foreign) => Value::Foreign(foreign.deep_copy(table)?),
            scalar => scalar.clone(),
        })
    }
}

impl DeepCopy for Object {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = Object::with_capacity(self.len());
        for (key, value) in self {
            let value = value
                .deep_copy(table)
                .map_err(|error| CopyError::key(key.as_str(), error))?;
            copy.insert(key.clone(), value);
        }
        Ok(copy)
    }
}

impl DeepCopy for Shared {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        Ok(Shared::from(self.as_rc().deep_copy(table)?))
    }
}

impl DeepCopy for Record {
    /// Private fields are not copied; the copy holds `Null` in their place.
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = Record::new(self.type_name());
        for field in self.fields() {
            let value = if field.is_public() {
                field
                    .value
                    .deep_copy(table)
                    .map_err(|error| CopyError::field(self.type_name(), field.name.as_str(), error))?
            } else {
                Value::Null
            };
            copy.push(RecordField {
                name: field.name.clone(),
                value,
                visibility: field.visibility,
                tag: field.tag.clone(),
            });
        }
        Ok(copy)
    }
}

impl DeepCopy for Foreign {
    /// Identifiers are immutable and are shared with the copy. Every other
    /// foreign kind is unsupported.
    fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
        if self.is_identifier() {
            return Ok(self.clone());
        }
        Err(CopyError::Unsupported {
            kind: self.kind(),
            type_name: self.type_name().to_string(),
        })
    }
}
