//! The observing side of the mechanism.
//!
//! A [`Ptr`] owns at most one heap allocated cell holding the address of the
//! target it observes. The cell is registered with that target exactly while it
//! holds a non-null address. Every lifecycle transition below keeps that rule:
//!
//! | transition           | registry effect                                   |
//! |----------------------|---------------------------------------------------|
//! | `null` / `default`   | none, no cell                                     |
//! | `new`                | fresh cell registered with the target             |
//! | `drop`               | cell unregistered if non-null, then freed         |
//! | `clone`              | fresh cell registered, or empty if source is null |
//! | `clone_from`         | same as `reset` to the source's target            |
//! | move / `take`        | none, the cell changes owner                      |
//! | `reset`              | register with new target, unregister from old     |

use core::{
    cell::Cell,
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    pin::Pin,
    ptr::{self, NonNull},
};

use crate::{
    storage::{CellRef, Slot},
    BadAccess,
    Ref,
    Result,
    Target,
};

/// A non-owning handle that becomes null when its [`Target`] is dropped.
///
/// Any number of handles may observe the same target without affecting its
/// lifetime. Dereferencing goes through [`Ptr::try_borrow`], which fails with
/// [`BadAccess`] instead of touching freed memory.
///
/// Handles compare and order by the address of the target they currently
/// observe; all handles observing nothing are equal.
///
/// # Example
/// ```rust
/// use dangling::{Ptr, Target};
///
/// let a = Box::pin(Target::new("a"));
/// let p1 = Ptr::new(a.as_ref());
/// let mut p2 = p1.clone();
/// assert_eq!(a.observers(), 2);
/// assert_eq!(p1, p2);
///
/// p2.reset(None);
/// assert_eq!(a.observers(), 1);
///
/// drop(a);
/// assert!(p1.is_null());
/// assert!(p1.try_borrow().is_err());
/// ```
pub struct Ptr<T> {
    cell: Option<NonNull<Slot<Target<T>>>>,
}

impl<T> Ptr<T> {

    /// A handle observing nothing. Allocates nothing.
    #[inline(always)]
    pub const fn null() -> Self {
        Self {
            cell: None,
        }
    }

    /// A handle observing `target`.
    #[inline(always)]
    pub fn new(target: Pin<&Target<T>>) -> Self {
        Self::observe(NonNull::from(target.get_ref()))
    }

    fn observe(target: NonNull<Target<T>>) -> Self {
        let cell = Self::alloc_cell();
        unsafe { target.as_ref() }.register(CellRef::new(cell));
        unsafe { cell.as_ref() }.set(Some(target));
        Self {
            cell: Some(cell),
        }
    }

    #[inline(always)]
    fn alloc_cell() -> NonNull<Slot<Target<T>>> {
        NonNull::from(Box::leak(Box::new(Cell::new(None))))
    }

    /// Unregisters `cell` if it observes something and frees it.
    ///
    /// # Safety
    /// `cell` must come from `alloc_cell` and be owned by the caller.
    unsafe fn release_cell(cell: NonNull<Slot<Target<T>>>) {
        unsafe {
            if let Some(target) = cell.as_ref().get() {
                target.as_ref().unregister(CellRef::new(cell));
            }
            drop(Box::from_raw(cell.as_ptr()));
        }
    }

    #[inline(always)]
    fn slot(&self) -> Option<&Slot<Target<T>>> {
        self.cell.map(|cell| unsafe { &*cell.as_ptr() })
    }

    /// The observed target, or `None` if there is none.
    #[inline(always)]
    pub fn get(&self) -> Option<NonNull<Target<T>>> {
        self.slot().and_then(Cell::get)
    }

    /// Address of the observed target, null if there is none.
    #[inline(always)]
    pub fn as_ptr(&self) -> *const Target<T> {
        self.get().map_or(ptr::null(), |target| target.as_ptr().cast_const())
    }

    #[inline(always)]
    pub fn is_null(&self) -> bool {
        self.get().is_none()
    }

    #[inline(always)]
    pub fn is_some(&self) -> bool {
        self.get().is_some()
    }

    /// Whether this handle currently observes `target`.
    #[inline(always)]
    pub fn points_to(&self, target: &Target<T>) -> bool {
        ptr::eq(self.as_ptr(), target)
    }

    /// Borrows the observed value.
    ///
    /// # Errors
    /// [`BadAccess`] if the handle observes nothing.
    #[inline(always)]
    pub fn try_borrow(&self) -> Result<Ref<'_, T>> {
        let target = self.get().ok_or(BadAccess)?;
        Ok(unsafe { Ref::new(target) })
    }

    /// Calls `f` with the observed value.
    ///
    /// # Errors
    /// [`BadAccess`] if the handle observes nothing.
    #[inline(always)]
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let value = self.try_borrow()?;
        Ok(f(&value))
    }

    /// Makes this handle observe `target`, or nothing.
    ///
    /// Does nothing if `target` is already the observed one.
    #[inline(always)]
    pub fn reset(&mut self, target: Option<Pin<&Target<T>>>) {
        self.reset_to(target.map(|target| NonNull::from(target.get_ref())))
    }

    fn reset_to(&mut self, target: Option<NonNull<Target<T>>>) {
        if self.get() == target {
            return
        }
        if let Some(new) = target {
            let cell = *self.cell.get_or_insert_with(Self::alloc_cell);
            unsafe { new.as_ref() }.register(CellRef::new(cell));
        }
        if let Some(cell) = self.cell {
            let slot = unsafe { cell.as_ref() };
            if let Some(old) = slot.get() {
                unsafe { old.as_ref() }.unregister(CellRef::new(cell));
            }
            slot.set(target);
        }
    }

    /// Moves the cell out, leaving this handle empty.
    ///
    /// The registry of the observed target is left untouched.
    #[inline(always)]
    pub fn take(&mut self) -> Self {
        Self {
            cell: self.cell.take(),
        }
    }
}

impl<T> Drop for Ptr<T> {

    fn drop(&mut self) {
        if let Some(cell) = self.cell.take() {
            unsafe { Self::release_cell(cell) }
        }
    }
}

impl<T> Clone for Ptr<T> {

    fn clone(&self) -> Self {
        match self.get() {
            Some(target) => Self::observe(target),
            None => Self::null(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.reset_to(source.get())
    }
}

impl<T> Default for Ptr<T> {

    #[inline(always)]
    fn default() -> Self {
        Self::null()
    }
}

impl<'a, T> From<Pin<&'a Target<T>>> for Ptr<T> {

    #[inline(always)]
    fn from(value: Pin<&'a Target<T>>) -> Self {
        Self::new(value)
    }
}

impl<'a, T> From<Option<Pin<&'a Target<T>>>> for Ptr<T> {

    #[inline(always)]
    fn from(value: Option<Pin<&'a Target<T>>>) -> Self {
        value.map_or_else(Self::null, Self::new)
    }
}

impl<T> PartialEq for Ptr<T> {

    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T> Eq for Ptr<T> {}

impl<T> PartialOrd for Ptr<T> {

    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Ptr<T> {

    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_ptr().cmp(&other.as_ptr())
    }
}

impl<T> Debug for Ptr<T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(target) => write!(f, "Ptr({:p})", target),
            None => write!(f, "Ptr(null)"),
        }
    }
}
