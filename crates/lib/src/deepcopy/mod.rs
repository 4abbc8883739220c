//! Cycle-safe deep copies.
//!
//! [`DeepCopy`] copies a value so that the copy shares no mutable node with
//! the source. Plain data is copied recursively. Reference-counted nodes
//! (`Rc<RefCell<T>>`, [`Shared`](crate::Shared)) go through a
//! [`CycleTable`] that maps every source node already copied to its copy:
//! a node reached a second time reuses that copy. Copies therefore
//! terminate on cyclic graphs and keep the sharing topology of the source,
//! so two fields aliasing one node still alias one node afterwards.
//!
//! Values that cannot be copied (raw pointers, function pointers, channel
//! endpoints and non-identifier foreign leaves) fail with
//! [`CopyError::Unsupported`], wrapped with the index, key or field leading
//! to them.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use arbor::deepcopy::deepcopy;
//!
//! let shared = Rc::new(RefCell::new(vec![1, 2]));
//! let pair = vec![shared.clone(), shared];
//!
//! let copy = deepcopy(pair.clone()).unwrap();
//! assert!(Rc::ptr_eq(&copy[0], &copy[1]));
//! assert!(!Rc::ptr_eq(&copy[0], &pair[0]));
//!
//! copy[0].borrow_mut().push(3);
//! assert_eq!(*pair[0].borrow(), vec![1, 2]);
//! ```

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::error::Error as StdError;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::rc::{Rc, Weak};
use std::sync::mpsc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::value::Kind;

mod errors;
mod value;

pub use errors::CopyError;

/// A type that can be deep-copied.
pub trait DeepCopy: Sized {
    /// Copies `self`, recording reference-counted nodes in `table`.
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError>;
}

/// Map from already-copied source nodes to their copies.
///
/// One table lives for exactly one top-level copy.
#[derive(Default)]
pub struct CycleTable {
    copies: HashMap<usize, Rc<dyn Any>>,
}

impl CycleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes copied so far
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Returns the copy already made of `source`.
    pub fn lookup<T: 'static>(&self, source: &Rc<RefCell<T>>) -> Option<Rc<RefCell<T>>> {
        let copy = self.copies.get(&address(source))?;
        Rc::clone(copy).downcast::<RefCell<T>>().ok()
    }

    /// Records `copy` as the copy of `source`.
    pub fn record<T: 'static>(&mut self, source: &Rc<RefCell<T>>, copy: &Rc<RefCell<T>>) {
        let copy: Rc<dyn Any> = Rc::clone(copy) as Rc<dyn Any>;
        self.copies.insert(address(source), copy);
    }
}

fn address<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

/// Deep-copies `value`.
///
/// On failure the untouched original is handed back inside the
/// [`CopyFailure`], never a partial copy.
pub fn deepcopy<T: DeepCopy>(value: T) -> Result<T, CopyFailure<T>> {
    match try_deepcopy(&value) {
        Ok(copy) => Ok(copy),
        Err(error) => Err(CopyFailure {
            original: value,
            error,
        }),
    }
}

/// Deep-copies a borrowed value.
pub fn try_deepcopy<T: DeepCopy>(value: &T) -> Result<T, CopyError> {
    let mut table = CycleTable::new();
    let copy = value.deep_copy(&mut table);
    match &copy {
        Ok(_) => trace!(nodes = table.len(), "deep copy finished"),
        Err(error) => debug!(%error, location = %error.location(), "deep copy failed"),
    }
    copy
}

/// A failed [`deepcopy`], carrying the original value.
#[derive(Debug)]
pub struct CopyFailure<T> {
    original: T,
    error: CopyError,
}

impl<T> CopyFailure<T> {
    pub fn original(&self) -> &T {
        &self.original
    }

    pub fn error(&self) -> &CopyError {
        &self.error
    }

    pub fn into_original(self) -> T {
        self.original
    }

    pub fn into_parts(self) -> (T, CopyError) {
        (self.original, self.error)
    }
}

impl<T> fmt::Display for CopyFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deep copy of {} failed: {}", type_name::<T>(), self.error)
    }
}

impl<T: fmt::Debug> StdError for CopyFailure<T> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<CopyFailure<T>> for crate::Error {
    fn from(failure: CopyFailure<T>) -> Self {
        crate::Error::Copy(failure.error)
    }
}

// ===== Plain data =====

macro_rules! copy_by_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl DeepCopy for $t {
                #[inline]
                fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
                    Ok(self.clone())
                }
            }
        )*
    };
}

copy_by_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    NaiveDate,
    NaiveDateTime,
    std::time::Duration,
);

impl<Tz: TimeZone> DeepCopy for DateTime<Tz> {
    fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
        Ok(self.clone())
    }
}

// ===== Containers =====

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        self.as_ref().map(|inner| inner.deep_copy(table)).transpose()
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        Ok(Box::new((**self).deep_copy(table)?))
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = Vec::with_capacity(self.len());
        for (index, item) in self.iter().enumerate() {
            copy.push(
                item.deep_copy(table)
                    .map_err(|error| CopyError::index(index, error))?,
            );
        }
        Ok(copy)
    }
}

impl<T: DeepCopy + Default, const N: usize> DeepCopy for [T; N] {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy: [T; N] = std::array::from_fn(|_| T::default());
        for (index, (slot, item)) in copy.iter_mut().zip(self).enumerate() {
            *slot = item
                .deep_copy(table)
                .map_err(|error| CopyError::index(index, error))?;
        }
        Ok(copy)
    }
}

fn copy_entry<K, V>(key: &K, value: &V, table: &mut CycleTable) -> Result<(K, V), CopyError>
where
    K: DeepCopy + fmt::Debug,
    V: DeepCopy,
{
    let key_copy = key
        .deep_copy(table)
        .map_err(|error| CopyError::map_key(format!("{key:?}"), error))?;
    let value_copy = value
        .deep_copy(table)
        .map_err(|error| CopyError::key(format!("{key:?}"), error))?;
    Ok((key_copy, value_copy))
}

impl<K, V, S> DeepCopy for HashMap<K, V, S>
where
    K: DeepCopy + Eq + Hash + fmt::Debug,
    V: DeepCopy,
    S: BuildHasher + Default,
{
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = HashMap::with_capacity_and_hasher(self.len(), S::default());
        for (key, value) in self {
            let (key, value) = copy_entry(key, value, table)?;
            copy.insert(key, value);
        }
        Ok(copy)
    }
}

impl<K, V, S> DeepCopy for IndexMap<K, V, S>
where
    K: DeepCopy + Eq + Hash + fmt::Debug,
    V: DeepCopy,
    S: BuildHasher + Default,
{
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = IndexMap::with_capacity_and_hasher(self.len(), S::default());
        for (key, value) in self {
            let (key, value) = copy_entry(key, value, table)?;
            copy.insert(key, value);
        }
        Ok(copy)
    }
}

impl<K, V> DeepCopy for BTreeMap<K, V>
where
    K: DeepCopy + Ord + fmt::Debug,
    V: DeepCopy,
{
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        let mut copy = BTreeMap::new();
        for (key, value) in self {
            let (key, value) = copy_entry(key, value, table)?;
            copy.insert(key, value);
        }
        Ok(copy)
    }
}

// ===== References =====

impl<T: DeepCopy + Default + 'static> DeepCopy for Rc<RefCell<T>> {
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        if let Some(copy) = table.lookup(self) {
            trace!(addr = address(self), "reusing copy of shared node");
            return Ok(copy);
        }
        // Registered before recursing so that cycles back to this node
        // resolve to the copy under construction.
        let copy = Rc::new(RefCell::new(T::default()));
        table.record(self, &copy);
        let source = self.try_borrow().map_err(|_| CopyError::Borrowed {
            type_name: type_name::<T>().to_string(),
        })?;
        let inner = source.deep_copy(table).map_err(CopyError::reference)?;
        copy.replace(inner);
        Ok(copy)
    }
}

impl<T: DeepCopy + Default + 'static> DeepCopy for Weak<RefCell<T>> {
    /// A live reference copies to a reference to the target's copy. The
    /// copy only stays alive if the copied graph holds it strongly.
    fn deep_copy(&self, table: &mut CycleTable) -> Result<Self, CopyError> {
        match self.upgrade() {
            Some(target) => Ok(Rc::downgrade(&target.deep_copy(table)?)),
            None => Ok(Weak::new()),
        }
    }
}

// ===== Unsupported kinds =====

impl<T: ?Sized> DeepCopy for *const T {
    fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
        Err(CopyError::unsupported::<Self>(Kind::Pointer))
    }
}

impl<T: ?Sized> DeepCopy for *mut T {
    fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
        Err(CopyError::unsupported::<Self>(Kind::Pointer))
    }
}

macro_rules! unsupported_channel {
    ($($channel:ident),*) => {
        $(
            impl<T> DeepCopy for mpsc::$channel<T> {
                fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
                    Err(CopyError::unsupported::<Self>(Kind::Channel))
                }
            }
        )*
    };
}

unsupported_channel!(Sender, SyncSender, Receiver);

macro_rules! unsupported_fn {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> DeepCopy for fn($($arg),*) -> R {
            fn deep_copy(&self, _: &mut CycleTable) -> Result<Self, CopyError> {
                Err(CopyError::unsupported::<Self>(Kind::Function))
            }
        }
    };
}

unsupported_fn!();
unsupported_fn!(A);
unsupported_fn!(A, B);
unsupported_fn!(A, B, C);

/// Implements [`DeepCopy`] for a struct with named fields.
///
/// Listed fields are deep-copied; fields under `skip` are reset to their
/// `Default`, the way private fields of a record are.
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use arbor::{deepcopy::deepcopy, impl_deep_copy};
///
/// #[derive(Debug, Default)]
/// struct Node {
///     name: String,
///     next: Option<Rc<RefCell<Node>>>,
///     visits: u32,
/// }
///
/// impl_deep_copy!(Node { name, next } skip { visits });
///
/// let node = Rc::new(RefCell::new(Node { name: "loop".into(), next: None, visits: 3 }));
/// node.borrow_mut().next = Some(node.clone());
///
/// let copy = deepcopy(node.clone()).unwrap();
/// let next = copy.borrow().next.clone().unwrap();
/// assert!(Rc::ptr_eq(&copy, &next));
/// assert_eq!(copy.borrow().visits, 0);
/// # node.borrow_mut().next = None;
/// # copy.borrow_mut().next = None;
/// ```
#[macro_export]
macro_rules! impl_deep_copy {
    ($ty:ident { $($field:ident),* $(,)? } $(skip { $($skipped:ident),* $(,)? })?) => {
        impl $crate::deepcopy::DeepCopy for $ty {
            fn deep_copy(
                &self,
                table: &mut $crate::deepcopy::CycleTable,
            ) -> ::std::result::Result<Self, $crate::deepcopy::CopyError> {
                ::std::result::Result::Ok(Self {
                    $(
                        $field: $crate::deepcopy::DeepCopy::deep_copy(&self.$field, table)
                            .map_err(|error| {
                                $crate::deepcopy::CopyError::field(
                                    stringify!($ty),
                                    stringify!($field),
                                    error,
                                )
                            })?,
                    )*
                    $($(
                        $skipped: ::std::default::Default::default(),
                    )*)?
                })
            }
        }
    };
}
