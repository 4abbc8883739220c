//! Constants shared across the arbor crate.

/// Setting this string through [`Object::set`](crate::Object::set) stores an explicit empty string.
pub const BLANK_STRING: &str = "(blank)";

/// Setting this string through [`Object::set`](crate::Object::set) stores an explicit null.
pub const NULL_STRING: &str = "(null)";

/// Separator between segments of a key path.
pub const PATH_SEPARATOR: char = '.';

/// Delimiter used to flatten both trees before diffing.
pub const DIFF_DELIMITER: &str = "/";

/// Separator between fields of a delimited pattern.
pub const PATTERN_SEPARATOR: char = '|';

/// Name prefix for pattern fields that are left empty.
pub const IGNORED_FIELD_PREFIX: &str = "ignored.field";

/// Prefix stored in place of a timestamp that failed to parse.
pub const TIMESTAMP_ERROR_PREFIX: &str = "err: ";
