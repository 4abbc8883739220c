//! Reference-counted tree nodes.

use std::cell::{BorrowError, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::Value;

/// A node that several parts of a tree may point at.
///
/// Cloning a `Shared` clones the handle, not the node. Path traversal treats
/// shared nodes as leaves; [`crate::deepcopy`] copies them once and
/// preserves the aliasing between the copies.
#[derive(Clone, Default)]
pub struct Shared(Rc<RefCell<Value>>);

impl Shared {
    /// Creates a new shared node holding `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Rc::new(RefCell::new(value.into())))
    }

    pub fn as_rc(&self) -> &Rc<RefCell<Value>> {
        &self.0
    }

    pub fn into_rc(self) -> Rc<RefCell<Value>> {
        self.0
    }

    /// Immutably borrows the node. Panics if it is mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Mutably borrows the node. Panics if it is already borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, Value>, BorrowError> {
        self.0.try_borrow()
    }

    /// Replaces the node's content, returning the old one.
    pub fn replace(&self, value: impl Into<Value>) -> Value {
        self.0.replace(value.into())
    }

    /// Returns true if both handles point at the same node.
    pub fn ptr_eq(&self, other: &Shared) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the node, stable for as long as the node is alive.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

impl From<Rc<RefCell<Value>>> for Shared {
    fn from(rc: Rc<RefCell<Value>>) -> Self {
        Self(rc)
    }
}
