//! Error types for deep copies.

use std::any::type_name;

use thiserror::Error;

use crate::value::Kind;

/// Why a deep copy failed.
///
/// Failures deep inside a tree are wrapped once per level with the index,
/// key, field or reference they passed through, so
/// [`location`](CopyError::location) can name the offending value and
/// [`root_cause`](CopyError::root_cause) can name the reason.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CopyError {
    /// The value is of a kind that cannot be copied
    #[error("unable to make a deep copy of {type_name}: kind {kind} is not supported")]
    Unsupported { kind: Kind, type_name: String },

    /// A reference target was mutably borrowed during the copy
    #[error("unable to make a deep copy of {type_name}: it is mutably borrowed")]
    Borrowed { type_name: String },

    /// Copying a sequence element failed
    #[error("failed to copy item at index {index}: {source}")]
    Index { index: usize, source: Box<CopyError> },

    /// Copying the value of a map entry failed
    #[error("failed to copy map item {key}: {source}")]
    Key { key: String, source: Box<CopyError> },

    /// Copying the key of a map entry failed
    #[error("failed to copy map key {key}: {source}")]
    MapKey { key: String, source: Box<CopyError> },

    /// Copying a record field failed
    #[error("failed to copy field {field} of {record}: {source}")]
    Field {
        record: String,
        field: String,
        source: Box<CopyError>,
    },

    /// Copying the value behind a reference failed
    #[error("failed to copy the value behind a reference: {source}")]
    Reference { source: Box<CopyError> },
}

impl CopyError {
    /// Unsupported-kind error naming the type `T`.
    pub fn unsupported<T: ?Sized>(kind: Kind) -> Self {
        CopyError::Unsupported {
            kind,
            type_name: type_name::<T>().to_string(),
        }
    }

    pub fn index(index: usize, source: CopyError) -> Self {
        CopyError::Index {
            index,
            source: Box::new(source),
        }
    }

    pub fn key(key: impl Into<String>, source: CopyError) -> Self {
        CopyError::Key {
            key: key.into(),
            source: Box::new(source),
        }
    }

    pub fn map_key(key: impl Into<String>, source: CopyError) -> Self {
        CopyError::MapKey {
            key: key.into(),
            source: Box::new(source),
        }
    }

    pub fn field(record: impl Into<String>, field: impl Into<String>, source: CopyError) -> Self {
        CopyError::Field {
            record: record.into(),
            field: field.into(),
            source: Box::new(source),
        }
    }

    pub fn reference(source: CopyError) -> Self {
        CopyError::Reference {
            source: Box::new(source),
        }
    }

    fn inner(&self) -> Option<&CopyError> {
        match self {
            CopyError::Index { source, .. }
            | CopyError::Key { source, .. }
            | CopyError::MapKey { source, .. }
            | CopyError::Field { source, .. }
            | CopyError::Reference { source } => Some(source),
            CopyError::Unsupported { .. } | CopyError::Borrowed { .. } => None,
        }
    }

    /// The innermost error, without location context.
    pub fn root_cause(&self) -> &CopyError {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }

    /// Path to the value that failed, e.g. `items[2].owner`.
    pub fn location(&self) -> String {
        let mut location = String::new();
        let mut current = self;
        while let Some(inner) = current.inner() {
            match current {
                CopyError::Index { index, .. } => location.push_str(&format!("[{index}]")),
                CopyError::Key { key, .. }
                | CopyError::MapKey { key, .. }
                | CopyError::Field { field: key, .. } => {
                    if !location.is_empty() {
                        location.push('.');
                    }
                    location.push_str(key);
                }
                _ => {}
            }
            current = inner;
        }
        location
    }

    /// The unsupported kind behind this error, if that is the cause.
    pub fn unsupported_kind(&self) -> Option<Kind> {
        match self.root_cause() {
            CopyError::Unsupported { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Check if this error was caused by an unsupported kind
    pub fn is_unsupported(&self) -> bool {
        self.unsupported_kind().is_some()
    }

    /// Check if this error was caused by a mutably borrowed reference
    pub fn is_borrowed(&self) -> bool {
        matches!(self.root_cause(), CopyError::Borrowed { .. })
    }
}

// Conversion from CopyError to the main Error type
impl From<CopyError> for crate::Error {
    fn from(err: CopyError) -> Self {
        crate::Error::Copy(err)
    }
}
