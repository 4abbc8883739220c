//! Opaque foreign leaves.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::mpsc;

use super::Kind;

/// A value owned by foreign code that a tree can carry but not look into.
///
/// Only [`Kind::Identifier`] leaves take part in normalization (through
/// [`ForeignValue::hex`]) and deep copies; every other kind is reported as
/// unsupported.
pub trait ForeignValue: fmt::Debug + Any {
    /// Kind reported to errors and to the deep-copy engine
    fn kind(&self) -> Kind;

    /// Name of the concrete type
    fn type_name(&self) -> &str;

    /// Hex form of an identifier
    fn hex(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Handle to a [`ForeignValue`].
#[derive(Clone)]
pub struct Foreign(Rc<dyn ForeignValue>);

impl Foreign {
    pub fn new(value: impl ForeignValue) -> Self {
        Self(Rc::new(value))
    }

    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    pub fn hex(&self) -> Option<String> {
        self.0.hex()
    }

    pub fn is_identifier(&self) -> bool {
        self.kind() == Kind::Identifier
    }

    /// Returns the concrete value if it has type `T`.
    pub fn downcast_ref<T: ForeignValue>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Foreign) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Foreign").field(&self.0).finish()
    }
}

/// A 12-byte document identifier rendered as 24 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses 24 hex digits.
    pub fn parse_str(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl FromStr for ObjectId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ForeignValue for ObjectId {
    fn kind(&self) -> Kind {
        Kind::Identifier
    }

    fn type_name(&self) -> &str {
        "ObjectId"
    }

    fn hex(&self) -> Option<String> {
        Some(self.to_hex())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: 'static> ForeignValue for mpsc::Sender<T> {
    fn kind(&self) -> Kind {
        Kind::Channel
    }

    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
