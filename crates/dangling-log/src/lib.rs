//! A small stderr logger with colored, user-formattable records.
//!
//! The logger is global and must be installed with [`init`] (or [`init_with`]).
//! Until then every logging call is a no-op that returns `Ok(false)`, which lets
//! libraries log unconditionally without forcing a logger on their users.
//!
//! Records are filtered per module with a [`Filter`], read from `RUST_LOG` by
//! default.

#[macro_use]

mod log;
mod error;
mod filter;
pub mod fmt;

pub use error::LogError;
pub use filter::Filter;
pub use fmt::{LogFmt, LogFmtBuilder, LogSpec};

pub type Result<T> = core::result::Result<T, LogError>;

pub use log::*;
