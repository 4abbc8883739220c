//! Foreign records.
//!
//! A [`Record`] stands in for an externally defined structured type: a type
//! name plus an ordered list of fields, each with a visibility and the
//! serialization tags that drive [`crate::normalize`].
//!
//! ```
//! # use arbor::{FieldTag, Record};
//! let user = Record::new("User")
//!     .with("name", "ada")
//!     .with_tagged("email", "", FieldTag::parse("email,omitempty"))
//!     .with_private("password", "secret");
//!
//! let object = user.to_object();
//! assert_eq!(object.get_string("name", ""), "ada");
//! assert!(!object.contains_key("email"));
//! assert!(!object.contains_key("password"));
//! ```

use super::{Value, equal};
use crate::Object;

/// Whether generic code may read a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Serialization annotations of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTag {
    /// Name used instead of the field name
    pub rename: Option<String>,
    /// Never emit this field
    pub skip: bool,
    /// Drop the field when its value is empty
    pub omit_empty: bool,
}

impl FieldTag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the familiar `name,omitempty` tag syntax.
    ///
    /// `-` alone skips the field; an empty name keeps the field name.
    pub fn parse(tag: &str) -> Self {
        if tag == "-" {
            return Self::new().skip();
        }
        let mut parts = tag.split(',');
        let mut parsed = Self::new();
        if let Some(name) = parts.next().filter(|name| !name.is_empty()) {
            parsed.rename = Some(name.to_string());
        }
        if parts.any(|option| option.trim() == "omitempty") {
            parsed.omit_empty = true;
        }
        parsed
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }
}

/// One field of a [`Record`].
#[derive(Debug, Clone)]
pub struct RecordField {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
    pub tag: FieldTag,
}

impl RecordField {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            visibility: Visibility::Public,
            tag: FieldTag::default(),
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn tagged(mut self, tag: FieldTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// The key this field is emitted under after normalization.
    pub fn serialized_name(&self) -> &str {
        self.tag.rename.as_deref().unwrap_or(&self.name)
    }
}

/// An externally defined record value.
#[derive(Debug, Clone)]
pub struct Record {
    type_name: String,
    fields: Vec<RecordField>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a public, untagged field.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_field(RecordField::new(name, value))
    }

    /// Adds a public field with serialization tags.
    pub fn with_tagged(
        self,
        name: impl Into<String>,
        value: impl Into<Value>,
        tag: FieldTag,
    ) -> Self {
        self.with_field(RecordField::new(name, value).tagged(tag))
    }

    /// Adds a field that generic code may not read.
    pub fn with_private(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_field(RecordField::new(name, value).private())
    }

    pub fn with_field(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn push(&mut self, field: RecordField) {
        self.fields.push(field);
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the value of the named field, public or not.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).map(|field| &field.value)
    }

    /// True when every public field holds an empty value.
    pub fn is_empty(&self) -> bool {
        self.fields
            .iter()
            .filter(|field| field.is_public())
            .all(|field| field.value.is_empty())
    }

    /// Normalizes this record into an [`Object`].
    pub fn to_object(&self) -> Object {
        crate::normalize::record_to_object(self)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        equal::records_equal(self, other)
    }
}
