/// Returned when dereferencing a [`Ptr`](crate::Ptr) that observes nothing.
///
/// The handle was never set, was reset to null, was moved out of, or its
/// target has been dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BadAccess;

impl core::fmt::Display for BadAccess {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bad dangling::Ptr access")
    }
}

impl core::error::Error for BadAccess {}
