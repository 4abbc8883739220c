//! Rebuilding nested objects from flat delimited text.
//!
//! A [`Decoder`] pairs a compiled [`Pattern`] with a source delimiter. It
//! scans the source parts left to right, storing each part under the name
//! of the pattern field at the cursor. An `array` or `arrayobj` field opens
//! a region: its part is the element count, and the cursor rewinds over the
//! element fields until that many elements have been read. An empty count
//! part opens nothing and the cursor moves on by one field.
//!
//! ```
//! use arbor::{Object, Value};
//!
//! let object = Object::from_delimited("7|2|5|10|A|B", "id(int)|pts(array,2)|x|y", "|").unwrap();
//! assert_eq!(object.get_int("id", 0), 7);
//! let points = object.get_object_array("pts").unwrap();
//! assert_eq!(points.len(), 2);
//! assert_eq!(points[1].get("y"), Some(&Value::from("B")));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::{debug, trace, warn};

use crate::{
    Object, Value, coerce,
    constants::TIMESTAMP_ERROR_PREFIX,
};

mod errors;
mod pattern;

pub use errors::DecodeError;
pub use pattern::{FieldType, Pattern, PatternField};

/// A compiled pattern and delimiter, reusable across sources.
#[derive(Debug, Clone)]
pub struct Decoder {
    pattern: Pattern,
    delimiter: String,
}

/// An open array region.
struct Region {
    field: String,
    /// Key field for `arrayobj` regions
    key: Option<String>,
    count: usize,
    fields: usize,
    part: usize,
    element: Object,
    items: Vec<Object>,
}

impl Region {
    fn is_complete(&self) -> bool {
        self.items.len() == self.count
    }

    /// Writes the finished region into `data`.
    fn close(self, data: &mut Object) -> Result<(), DecodeError> {
        let Some(key_field) = self.key else {
            let items: Vec<Value> = self.items.into_iter().map(Value::Object).collect();
            data.set(&self.field, items);
            return Ok(());
        };

        let mut keyed = Object::new();
        for (element, mut item) in self.items.into_iter().enumerate() {
            let key = item.get_string(&key_field, "");
            if key.is_empty() {
                return Err(DecodeError::MissingObjectKey {
                    field: self.field,
                    key: key_field,
                    element,
                });
            }
            item.delete(&key_field);
            keyed.set(&key, item);
        }
        data.set(&self.field, keyed);
        Ok(())
    }
}

impl Decoder {
    /// Compiles `pattern`. Every pattern error surfaces here.
    pub fn new(pattern: &str, delimiter: impl Into<String>) -> Result<Self, DecodeError> {
        Ok(Self::with_pattern(Pattern::parse(pattern)?, delimiter))
    }

    pub fn with_pattern(pattern: Pattern, delimiter: impl Into<String>) -> Self {
        Self {
            pattern,
            delimiter: delimiter.into(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Decodes one source string into a fresh object.
    pub fn decode(&self, source: &str) -> Result<Object, DecodeError> {
        let mut data = Object::new();
        let mut region: Option<Region> = None;
        let mut cursor = 0usize;

        for part in self.split(source) {
            let field = self.pattern.field(cursor);
            cursor += 1;

            let element_fields = field
                .field_type()
                .element_fields()
                .filter(|_| !part.is_empty());
            if let Some(fields) = element_fields {
                if let Some(open) = &region {
                    return Err(DecodeError::NestedArray {
                        field: field.name().to_string(),
                        open: open.field.clone(),
                    });
                }
                let count = coerce::parse_int(part);
                if count <= 0 {
                    trace!(field = field.name(), count, "empty array, skipping its elements");
                    cursor += fields;
                    continue;
                }
                let key = match field.field_type() {
                    FieldType::ArrayObj { key, .. } => Some(key.clone()),
                    _ => None,
                };
                region = Some(Region {
                    field: field.name().to_string(),
                    key,
                    count: usize::try_from(count).unwrap_or(usize::MAX),
                    fields,
                    part: 0,
                    element: Object::new(),
                    items: Vec::new(),
                });
                continue;
            }

            if !part.is_empty() {
                let target = match region.as_mut() {
                    Some(region) => &mut region.element,
                    None => &mut data,
                };
                target.set(field.name(), decode_part(field.field_type(), part));
            }

            let Some(open) = region.as_mut() else {
                continue;
            };
            open.part += 1;
            if open.part < open.fields {
                continue;
            }
            open.part = 0;
            let element = std::mem::take(&mut open.element);
            open.items.push(element);
            if open.is_complete() {
                if let Some(done) = region.take() {
                    done.close(&mut data)?;
                }
            } else {
                cursor -= open.fields;
            }
        }

        if let Some(open) = region {
            warn!(
                field = %open.field,
                expected = open.count,
                read = open.items.len(),
                "source ended inside an array, dropping it"
            );
        }
        debug!(fields = data.len(), "decoded delimited source");
        Ok(data)
    }

    fn split<'a>(&self, source: &'a str) -> Vec<&'a str> {
        if self.delimiter.is_empty() {
            return source
                .char_indices()
                .map(|(start, c)| &source[start..start + c.len_utf8()])
                .collect();
        }
        source.split(self.delimiter.as_str()).collect()
    }
}

fn decode_part(field_type: &FieldType, part: &str) -> Value {
    match field_type {
        FieldType::Int => Value::Int(coerce::parse_int(part)),
        FieldType::Float => Value::Float(coerce::to_float(&Value::from(part))),
        FieldType::Bool => Value::Bool(coerce::parse_bool(part)),
        FieldType::Timestamp { layout } => match parse_timestamp(part, layout.as_deref()) {
            Ok(time) => Value::String(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Err(err) => Value::String(format!("{TIMESTAMP_ERROR_PREFIX}{err}")),
        },
        _ => Value::from(part),
    }
}

/// Parses `text` with a strftime `layout`, reading zone-less times as UTC.
fn parse_timestamp(text: &str, layout: Option<&str>) -> Result<DateTime<Utc>, chrono::ParseError> {
    let Some(layout) = layout else {
        return DateTime::parse_from_rfc3339(text).map(|time| time.with_timezone(&Utc));
    };
    if let Ok(time) = DateTime::parse_from_str(text, layout) {
        return Ok(time.with_timezone(&Utc));
    }
    if let Ok(time) = NaiveDateTime::parse_from_str(text, layout) {
        return Ok(time.and_utc());
    }
    NaiveDate::parse_from_str(text, layout).map(|date| date.and_time(Default::default()).and_utc())
}

/// One-shot form of [`Decoder::decode`].
pub fn decode(source: &str, pattern: &str, delimiter: &str) -> Result<Object, DecodeError> {
    Decoder::new(pattern, delimiter)?.decode(source)
}

impl Object {
    /// Builds an object from delimited `source` text described by `pattern`.
    pub fn from_delimited(source: &str, pattern: &str, delimiter: &str) -> Result<Object, DecodeError> {
        decode(source, pattern, delimiter)
    }
}
