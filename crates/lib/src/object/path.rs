//! Key paths for addressing values inside an [`Object`](crate::Object).
//!
//! A key path is a dot-separated list of segments. Each segment names an
//! object key and may carry a bracketed array index:
//!
//! ```rust
//! # use arbor::object::path::KeyPath;
//! let path = KeyPath::parse("a.b[2].c");
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.segments()[1].key(), "b");
//! assert_eq!(path.segments()[1].index(), Some(2));
//! assert_eq!(path.to_string(), "a.b[2].c");
//! ```
//!
//! Parsing never fails. A few forms are accepted leniently:
//!
//! - a `[` at the start of a segment is part of the key, so `[0]` is a
//!   plain key
//! - a missing `]` is tolerated and the index runs to the end of the segment
//! - anything after `]` is ignored
//! - index text that is not an integer reads as `0`

use std::{convert::Infallible, fmt, str::FromStr};

use crate::constants::PATH_SEPARATOR;

/// One segment of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    key: String,
    index: Option<i64>,
}

impl Segment {
    /// Creates a segment addressing a plain key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    /// Creates a segment addressing an element of the array stored at `key`.
    pub fn indexed(key: impl Into<String>, index: i64) -> Self {
        Self {
            key: key.into(),
            index: Some(index),
        }
    }

    /// Parses a single segment.
    ///
    /// ```rust
    /// # use arbor::object::path::Segment;
    /// assert_eq!(Segment::parse("items[3]"), Segment::indexed("items", 3));
    /// assert_eq!(Segment::parse("items[3"), Segment::indexed("items", 3));
    /// assert_eq!(Segment::parse("items[x]"), Segment::indexed("items", 0));
    /// assert_eq!(Segment::parse("[3]"), Segment::new("[3]"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let Some(open) = raw.find('[').filter(|&open| open > 0) else {
            return Self::new(raw);
        };
        let rest = &raw[open + 1..];
        let text = match rest.find(']') {
            Some(close) => &rest[..close],
            None => rest,
        };
        Self::indexed(&raw[..open], crate::coerce::parse_int(text))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn index(&self) -> Option<i64> {
        self.index
    }

    /// Resolves the index against an array of length `len`.
    ///
    /// Returns `None` for out-of-range and negative indices.
    pub fn position(&self, len: usize) -> Option<usize> {
        let index = usize::try_from(self.index?).ok()?;
        (index < len).then_some(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.key),
            None => f.write_str(&self.key),
        }
    }
}

/// A parsed key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    /// Parses a key path. The empty string is a single empty key.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split(PATH_SEPARATOR).map(Segment::parse).collect(),
        }
    }

    /// Appends a segment (builder style)
    pub fn push(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the final segment and the segments leading to it.
    pub fn split_last(&self) -> Option<(&Segment, &[Segment])> {
        self.segments.split_last()
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
