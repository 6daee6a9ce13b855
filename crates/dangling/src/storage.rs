//! Registry storage for the cells a target is observed through.
//!
//! [`SetStorage`] is the default. [`ListStorage`] trades O(n) removal for a
//! smaller footprint on targets that only ever see a handful of handles, and is
//! selected with the `list-registry` feature.

use core::{
    cell::Cell,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    ptr::NonNull,
};

use rustc_hash::FxHashSet;

/// A handle's indirection cell: the observed target, or `None`.
pub(crate) type Slot<X> = Cell<Option<NonNull<X>>>;

#[cfg(not(feature = "list-registry"))]
pub(crate) type Registry<X> = SetStorage<X>;

#[cfg(feature = "list-registry")]
pub(crate) type Registry<X> = ListStorage<X>;

/// Address of a cell owned by some handle. Never owns the cell.
pub(crate) struct CellRef<X>(NonNull<Slot<X>>);

impl<X> CellRef<X> {

    #[inline(always)]
    pub fn new(cell: NonNull<Slot<X>>) -> Self {
        Self(cell)
    }

    /// Writes `None` into the cell.
    ///
    /// # Safety
    /// The cell must still be allocated.
    #[inline(always)]
    pub unsafe fn clear(self) {
        unsafe {
            self.0.as_ref().set(None);
        }
    }
}

impl<X> Clone for CellRef<X> {

    fn clone(&self) -> Self {
        *self
    }
}

impl<X> Copy for CellRef<X> {}

impl<X> PartialEq for CellRef<X> {

    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<X> Eq for CellRef<X> {}

impl<X> Hash for CellRef<X> {

    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<X> Debug for CellRef<X> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CellRef({:p})", self.0)
    }
}

pub(crate) trait Storage<X>: Default {

    /// Adds `cell`, returning `false` if it was already present.
    fn insert(&mut self, cell: CellRef<X>) -> bool;

    /// Removes `cell`, returning `false` if it was absent.
    fn remove(&mut self, cell: CellRef<X>) -> bool;

    fn len(&self) -> usize;

    /// Empties the storage, visiting every cell exactly once.
    fn drain_each(&mut self, f: impl FnMut(CellRef<X>));
}

#[cfg_attr(feature = "list-registry", allow(dead_code))]
pub(crate) struct SetStorage<X> {
    cells: FxHashSet<CellRef<X>>,
}

impl<X> Default for SetStorage<X> {

    fn default() -> Self {
        Self {
            cells: FxHashSet::default(),
        }
    }
}

impl<X> Storage<X> for SetStorage<X> {

    #[inline(always)]
    fn insert(&mut self, cell: CellRef<X>) -> bool {
        self.cells.insert(cell)
    }

    #[inline(always)]
    fn remove(&mut self, cell: CellRef<X>) -> bool {
        self.cells.remove(&cell)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn drain_each(&mut self, f: impl FnMut(CellRef<X>)) {
        self.cells.drain().for_each(f);
    }
}

/// Only checks for duplicates with debug assertions enabled.
#[cfg_attr(not(feature = "list-registry"), allow(dead_code))]
pub(crate) struct ListStorage<X> {
    cells: Vec<CellRef<X>>,
}

impl<X> Default for ListStorage<X> {

    fn default() -> Self {
        Self {
            cells: Vec::new(),
        }
    }
}

impl<X> Storage<X> for ListStorage<X> {

    fn insert(&mut self, cell: CellRef<X>) -> bool {
        if cfg!(debug_assertions) && self.cells.contains(&cell) {
            return false
        }
        self.cells.push(cell);
        true
    }

    fn remove(&mut self, cell: CellRef<X>) -> bool {
        match self.cells.iter().position(|&c| c == cell) {
            Some(index) => {
                self.cells.swap_remove(index);
                true
            },
            None => false,
        }
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn drain_each(&mut self, f: impl FnMut(CellRef<X>)) {
        self.cells.drain(..).for_each(f);
    }
}
