//! The observed side of the mechanism.

use core::{
    cell::{Cell, RefCell},
    fmt::{self, Debug, Formatter},
    marker::PhantomPinned,
    ops::{Deref, DerefMut},
};

use dangling_log::{error, trace};

use crate::storage::{CellRef, Registry, Storage};

/// A value that [`Ptr`](crate::Ptr)s can observe.
///
/// `Target` wraps an ordinary value and remembers the indirection cell of every
/// handle currently pointing at it. When the target is dropped, every one of
/// those cells is set to null, so the handles observe nothing from then on.
///
/// Handles are created from a `Pin<&Target<T>>`: a target must stay put while
/// it is observed. Pin it with [`Box::pin`], [`core::pin::pin!`] or any other
/// pinning constructor. A pinned target only hands out shared access to its
/// value; use interior mutability in `T` where it needs to change.
///
/// # Example
/// ```rust
/// use dangling::{Ptr, Target};
///
/// let target = Box::pin(Target::new(5u32));
/// let ptr = Ptr::new(target.as_ref());
/// assert_eq!(target.observers(), 1);
/// assert_eq!(*ptr.try_borrow().unwrap(), 5);
///
/// drop(target);
/// assert!(ptr.is_null());
/// ```
pub struct Target<T> {
    observers: Observers<T>,
    value: T,
    _pin: PhantomPinned,
}

/// Registered cells and outstanding borrows.
///
/// Declared before the value so that handles are cleared before `T` is dropped.
struct Observers<T> {
    registry: RefCell<Registry<Target<T>>>,
    borrows: Cell<usize>,
}

impl<T> Drop for Observers<T> {

    fn drop(&mut self) {
        let borrows = self.borrows.get();
        if borrows != 0 {
            error!("target dropped with {} live borrows through its handles", borrows);
            std::process::abort()
        }
        let registry = self.registry.get_mut();
        let count = registry.len();
        registry.drain_each(|cell| unsafe {
            cell.clear()
        });
        if count != 0 {
            trace!("target dropped, nulled {} handles", count);
        }
    }
}

impl<T> Target<T> {

    #[inline(always)]
    pub fn new(value: T) -> Self {
        Self {
            observers: Observers {
                registry: RefCell::new(Default::default()),
                borrows: Cell::new(0),
            },
            value,
            _pin: PhantomPinned,
        }
    }

    /// Unwraps the value. An unpinned target has no handles to clear.
    #[inline(always)]
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Number of handles currently observing this target.
    #[inline(always)]
    pub fn observers(&self) -> usize {
        self.observers.registry.borrow().len()
    }

    #[inline(always)]
    pub fn is_observed(&self) -> bool {
        self.observers() != 0
    }

    /// Number of live [`Ref`](crate::Ref) guards into this target.
    #[inline(always)]
    pub fn borrows(&self) -> usize {
        self.observers.borrows.get()
    }

    pub(crate) fn register(&self, cell: CellRef<Self>) {
        if !self.observers.registry.borrow_mut().insert(cell) {
            error!("{:?} registered twice", cell);
            panic!("{:?} registered twice with the same target", cell)
        }
    }

    pub(crate) fn unregister(&self, cell: CellRef<Self>) {
        if !self.observers.registry.borrow_mut().remove(cell) {
            error!("{:?} unregistered without being registered", cell);
            panic!("{:?} is not registered with this target", cell)
        }
    }

    #[inline(always)]
    pub(crate) fn acquire(&self) {
        let borrows = &self.observers.borrows;
        borrows.set(borrows.get() + 1);
    }

    #[inline(always)]
    pub(crate) fn release(&self) {
        let borrows = &self.observers.borrows;
        borrows.set(borrows.get() - 1);
    }
}

impl<T> Deref for Target<T> {

    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for Target<T> {

    /// Only reachable while the target is unpinned, when nothing observes it.
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: Default> Default for Target<T> {

    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Target<T> {

    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Debug> Debug for Target<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("value", &self.value)
            .field("observers", &self.observers())
            .finish()
    }
}
