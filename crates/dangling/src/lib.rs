//! Non-owning handles that become null when the value they observe is dropped.
//!
//! A [`Target<T>`] wraps an ordinary value with an ordinary lifetime. Any number
//! of [`Ptr<T>`] handles may observe it. The target keeps the address of every
//! handle's indirection cell and, when it is dropped, writes null into each of
//! them. Handles never keep their target alive; they only find out that it is
//! gone.
//!
//! The mechanism is single-threaded: neither type is `Send` or `Sync`.
//!
//! # Features
//!
//! - `list-registry`: keep registered cells in a vector instead of a hash set.
//!
//! # Example
//!
//! ```rust
//! use dangling::{Ptr, Target};
//!
//! struct Window {
//!     title: &'static str,
//! }
//!
//! let window = Box::pin(Target::new(Window { title: "main" }));
//! let focus = Ptr::new(window.as_ref());
//! assert_eq!(focus.with(|w| w.title), Ok("main"));
//!
//! drop(window);
//! assert!(focus.with(|w| w.title).is_err());
//! ```

mod error;
mod guard;
mod ptr;
mod storage;
mod target;

pub use error::BadAccess;
pub use guard::Ref;
pub use ptr::Ptr;
pub use target::Target;

pub type Result<T> = core::result::Result<T, BadAccess>;
