//!
//! Arbor: dynamic JSON-like trees for Rust.
//! This library provides an ordered, dynamically typed object model together with the
//! tooling needed to work with loosely structured data.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The recursive union of scalars, byte buffers, timestamps,
//!   arrays, objects, shared nodes, foreign records and opaque foreign leaves.
//! * **Objects (`object::Object`)**: Insertion-ordered maps addressed by key paths such as
//!   `a.b[2].c`, with lenient typed getters, merging, flattening and structural diffs.
//! * **Deep copies (`deepcopy::DeepCopy`)**: Cycle-safe copies that preserve the sharing
//!   topology of reference-counted nodes and fail loudly on values that cannot be copied.
//! * **Delimited decoding (`delimited::Decoder`)**: Rebuilds nested objects and repeated
//!   array groups from a single flat delimited string using a small pattern language.
//! * **Coercion and normalization (`coerce`, `normalize`)**: Total conversions between value
//!   kinds, and the projection of foreign records into plain objects.
//!
//! ```
//! use arbor::Object;
//!
//! let mut config = Object::from_json(r#"{"server":{"port":8080}}"#);
//! config.set("server.name", "edge");
//!
//! assert_eq!(config.get_int("server.port", 0), 8080);
//! assert_eq!(config.get_string("server.name", ""), "edge");
//! assert!(!config.exists("server.hosts"));
//! assert_eq!(config.to_string(), r#"{"server":{"port":8080,"name":"edge"}}"#);
//! ```

pub mod coerce;
pub mod constants;
pub mod deepcopy;
pub mod delimited;
pub mod normalize;
pub mod object;
pub mod value;

pub use deepcopy::{CopyError, CopyFailure, DeepCopy, deepcopy, try_deepcopy};
pub use delimited::{DecodeError, Decoder};
pub use object::{FieldDiff, IntoObject, Object, ObjectDiff, flatten::diff};
pub use value::{FieldTag, Foreign, Kind, ObjectId, Record, Shared, Value};

/// Result type used throughout the Arbor library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Arbor library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A value that had to be object-shaped was not
    #[error("expected an object, found {kind}")]
    NotAnObject { kind: Kind },

    /// Structured deep copy errors from the deepcopy module
    #[error(transparent)]
    Copy(deepcopy::CopyError),

    /// Structured decoding errors from the delimited module
    #[error(transparent)]
    Decode(delimited::DecodeError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Copy(_) => "deepcopy",
            Error::Decode(_) => "delimited",
            Error::NotAnObject { .. } => "object",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error names a kind that cannot be handled.
    pub fn is_unsupported(&self) -> bool {
        match self {
            Error::Copy(copy_err) => copy_err.is_unsupported(),
            Error::NotAnObject { .. } => true,
            _ => false,
        }
    }

    /// Check if this error comes from a malformed delimited pattern.
    pub fn is_pattern_error(&self) -> bool {
        match self {
            Error::Decode(decode_err) => decode_err.is_pattern_error(),
            _ => false,
        }
    }

    /// Check if this error is related to serialization.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
