use core::{
    fmt::{self, Debug, Display, Formatter},
    marker::PhantomData,
    ops::Deref,
    ptr::NonNull,
};

use crate::Target;

/// Shared access to a target, obtained through [`Ptr::try_borrow`](crate::Ptr::try_borrow).
///
/// The target counts live guards. Dropping a target while a guard into it is
/// alive aborts the process.
pub struct Ref<'a, T> {
    target: NonNull<Target<T>>,
    _marker: PhantomData<&'a Target<T>>,
}

impl<'a, T> Ref<'a, T> {

    /// # Safety
    /// `target` must point to a live target.
    #[inline(always)]
    pub(crate) unsafe fn new(target: NonNull<Target<T>>) -> Self {
        unsafe { target.as_ref() }.acquire();
        Self {
            target,
            _marker: PhantomData,
        }
    }

    /// The target this guard borrows from.
    #[inline(always)]
    pub fn target(this: &Self) -> &Target<T> {
        unsafe { this.target.as_ref() }
    }
}

impl<'a, T> Deref for Ref<'a, T> {

    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        Ref::target(self)
    }
}

impl<'a, T> Drop for Ref<'a, T> {

    #[inline(always)]
    fn drop(&mut self) {
        Ref::target(self).release();
    }
}

impl<'a, T: Debug> Debug for Ref<'a, T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        <T as Debug>::fmt(self, f)
    }
}

impl<'a, T: Display> Display for Ref<'a, T> {

    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        <T as Display>::fmt(self, f)
    }
}
