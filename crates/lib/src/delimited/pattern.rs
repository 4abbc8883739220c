//! The pattern language of the delimited decoder.
//!
//! A pattern is a list of segments separated by `|`. Each segment describes
//! one part of the source:
//!
//! | Segment                      | Meaning                                          |
//! |------------------------------|--------------------------------------------------|
//! | `name`, `name()`             | string field                                     |
//! | `name(int)`                  | integer field, see [`coerce::parse_int`]          |
//! | `name(float)`, `name(bool)`  | float and boolean fields                         |
//! | `name(timestamp,layout)`     | time parsed with a `chrono` strftime layout      |
//! | `name(array,n)`              | element count; the next `n` segments repeat      |
//! | `name(arrayobj,n,key)`       | like `array`, elements keyed by their `key` field |
//! | *(empty)*                    | ignored part, stored as `ignored.field<position>` |
//!
//! Field names are paths, so `user.name` nests.
//!
//! [`coerce::parse_int`]: crate::coerce::parse_int

use std::borrow::Cow;
use std::fmt;

use super::DecodeError;
use crate::{
    coerce,
    constants::{IGNORED_FIELD_PREFIX, PATTERN_SEPARATOR},
};

/// The type of one pattern field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    /// A time; `None` reads RFC 3339.
    Timestamp { layout: Option<String> },
    /// Start of an array whose elements span `fields` segments.
    Array { fields: usize },
    /// Start of an array reindexed into an object by each element's `key`.
    ArrayObj { fields: usize, key: String },
}

impl FieldType {
    /// Number of segments per element, for array types
    pub fn element_fields(&self) -> Option<usize> {
        match self {
            FieldType::Array { fields } | FieldType::ArrayObj { fields, .. } => Some(*fields),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Timestamp { .. } => "timestamp",
            FieldType::Array { .. } => "array",
            FieldType::ArrayObj { .. } => "arrayobj",
        }
    }
}

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternField {
    name: String,
    field_type: FieldType,
}

impl PatternField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// The field stored for an empty segment, or a part past the pattern end.
    pub fn ignored(position: usize) -> Self {
        Self::new(format!("{IGNORED_FIELD_PREFIX}{position}"), FieldType::String)
    }

    /// Compiles the segment at `position`.
    pub fn parse(segment: &str, position: usize) -> Result<Self, DecodeError> {
        if segment.is_empty() {
            return Ok(Self::ignored(position));
        }
        let Some(open) = segment.find('(') else {
            return Ok(Self::new(segment, FieldType::String));
        };
        let name = &segment[..open];
        let Some(close) = segment.find(')') else {
            return Err(DecodeError::MissingParenthesis {
                segment: segment.to_string(),
                position,
            });
        };
        if close < open {
            return Err(DecodeError::BadFormat {
                segment: segment.to_string(),
                position,
            });
        }

        let args: Vec<&str> = segment[open + 1..close].split(',').map(str::trim).collect();
        let type_name = args[0].to_ascii_lowercase();
        let arg = |n: usize| args.get(n).copied().filter(|arg| !arg.is_empty());

        let field_type = match type_name.as_str() {
            "" | "string" => FieldType::String,
            "int" => FieldType::Int,
            "float" => FieldType::Float,
            "bool" => FieldType::Bool,
            "timestamp" => FieldType::Timestamp {
                layout: arg(1).map(str::to_string),
            },
            "array" | "arrayobj" => {
                let size = arg(1).map(coerce::parse_int).unwrap_or_default();
                if size < 1 {
                    return Err(DecodeError::InvalidArraySize {
                        field: name.to_string(),
                        size,
                        position,
                    });
                }
                let fields = usize::try_from(size).unwrap_or(usize::MAX);
                if type_name == "array" {
                    FieldType::Array { fields }
                } else {
                    let Some(key) = arg(2) else {
                        return Err(DecodeError::ArrayObjMissingKey {
                            field: name.to_string(),
                            position,
                        });
                    };
                    FieldType::ArrayObj {
                        fields,
                        key: key.to_string(),
                    }
                }
            }
            _ => {
                return Err(DecodeError::UnknownType {
                    type_name: args[0].to_string(),
                    position,
                });
            }
        };
        Ok(Self::new(name, field_type))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }
}

impl fmt::Display for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.name, self.field_type.as_str())?;
        match &self.field_type {
            FieldType::Timestamp {
                layout: Some(layout),
            } => write!(f, ",{layout}")?,
            FieldType::Array { fields } => write!(f, ",{fields}")?,
            FieldType::ArrayObj { fields, key } => write!(f, ",{fields},{key}")?,
            _ => {}
        }
        f.write_str(")")
    }
}

/// A compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    fields: Vec<PatternField>,
}

impl Pattern {
    /// Compiles every segment of `pattern`, failing on the first bad one.
    ///
    /// ```
    /// use arbor::delimited::{FieldType, Pattern};
    ///
    /// let pattern = Pattern::parse("id(int)|tags(array,1)|tag").unwrap();
    /// assert_eq!(pattern.len(), 3);
    /// assert_eq!(pattern.get(1).unwrap().field_type(), &FieldType::Array { fields: 1 });
    ///
    /// assert!(Pattern::parse("items(arrayobj,2)").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self, DecodeError> {
        let fields = pattern
            .split(PATTERN_SEPARATOR)
            .enumerate()
            .map(|(position, segment)| PatternField::parse(segment, position))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&PatternField> {
        self.fields.get(position)
    }

    /// The field at `position`; positions past the end are ignored fields.
    pub fn field(&self, position: usize) -> Cow<'_, PatternField> {
        match self.fields.get(position) {
            Some(field) => Cow::Borrowed(field),
            None => Cow::Owned(PatternField::ignored(position)),
        }
    }

    pub fn fields(&self) -> &[PatternField] {
        &self.fields
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, field) in self.fields.iter().enumerate() {
            if position > 0 {
                write!(f, "{PATTERN_SEPARATOR}")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Pattern {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
