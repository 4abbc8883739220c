//! Error types for delimited decoding.
//!
//! Pattern errors are raised while compiling a pattern, before any source
//! text is read. Decode errors are raised by the structural steps of the
//! scan and abort it without returning a partial tree.

use thiserror::Error;

/// Structured error types for delimited decoding.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A segment opens an argument list it never closes
    #[error("pattern segment {position} ({segment:?}) is missing a closing parenthesis")]
    MissingParenthesis { segment: String, position: usize },

    /// A segment closes its argument list before opening it
    #[error("pattern segment {position} ({segment:?}) is badly formatted")]
    BadFormat { segment: String, position: usize },

    /// A segment names a type the decoder does not know
    #[error("pattern segment {position} has invalid data type {type_name:?}")]
    UnknownType { type_name: String, position: usize },

    /// An `arrayobj` segment without its key field argument
    #[error("arrayobj field {field:?} requires a key field argument")]
    ArrayObjMissingKey { field: String, position: usize },

    /// An array segment whose element has no fields
    #[error("array field {field:?} needs at least one field per element, got {size}")]
    InvalidArraySize {
        field: String,
        size: i64,
        position: usize,
    },

    /// An array started while another array region was still open
    #[error("array field {field:?} starts inside array {open:?}; arrays cannot be nested")]
    NestedArray { field: String, open: String },

    /// An `arrayobj` element has no value for its key field
    #[error("bad array {field:?}: element {element} is missing object key {key:?}")]
    MissingObjectKey {
        field: String,
        key: String,
        element: usize,
    },
}

impl DecodeError {
    /// Check if this error was raised while compiling the pattern
    pub fn is_pattern_error(&self) -> bool {
        matches!(
            self,
            DecodeError::MissingParenthesis { .. }
                | DecodeError::BadFormat { .. }
                | DecodeError::UnknownType { .. }
                | DecodeError::ArrayObjMissingKey { .. }
                | DecodeError::InvalidArraySize { .. }
        )
    }

    /// Check if this error was raised while reading the source
    pub fn is_source_error(&self) -> bool {
        !self.is_pattern_error()
    }

    /// Check if this error is about a missing `arrayobj` key
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self,
            DecodeError::ArrayObjMissingKey { .. } | DecodeError::MissingObjectKey { .. }
        )
    }

    /// Position of the offending pattern segment, for pattern errors
    pub fn position(&self) -> Option<usize> {
        match self {
            DecodeError::MissingParenthesis { position, .. }
            | DecodeError::BadFormat { position, .. }
            | DecodeError::UnknownType { position, .. }
            | DecodeError::ArrayObjMissingKey { position, .. }
            | DecodeError::InvalidArraySize { position, .. } => Some(*position),
            _ => None,
        }
    }
}

impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        crate::Error::Decode(err)
    }
}
