use std::sync::{Mutex, OnceLock, PoisonError};

use core::str::FromStr;

use termcolor::{StandardStream, ColorChoice};

pub use termcolor::{ColorSpec, Color};

use crate::*;

#[repr(i8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Level {
    Always = -1,
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Level {

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "ALWAYS",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Self::Always => None,
            Self::Error => Some(Color::Red),
            Self::Warn => Some(Color::Yellow),
            Self::Info => Some(Color::Green),
            Self::Debug => Some(Color::Blue),
            Self::Trace => Some(Color::Cyan),
        }
    }
}

impl FromStr for Level {

    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else {
            Err(())
        }
    }
}

/// Handle to a format registered with [`custom_fmt`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CustomFmt(usize);

impl CustomFmt {

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

pub enum LevelFmt {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Other(CustomFmt, Level),
}

impl LevelFmt {

    #[inline(always)]
    pub fn level(&self) -> Level {
        match *self {
            Self::Error => Level::Error,
            Self::Warn => Level::Warn,
            Self::Info => Level::Info,
            Self::Debug => Level::Debug,
            Self::Trace => Level::Trace,
            Self::Other(_, level) => level,
        }
    }
}

struct Logger {
    stderr: StandardStream,
    error_fmt: LogFmt,
    warn_fmt: LogFmt,
    info_fmt: LogFmt,
    debug_fmt: LogFmt,
    trace_fmt: LogFmt,
    custom_fmt: Vec<LogFmt>,
    filter: Filter,
}

impl Logger {

    #[inline(always)]
    fn new(filter: Filter) -> Self {
        Self {
            stderr: StandardStream::stderr(ColorChoice::Auto),
            error_fmt: LogFmt::for_level(Level::Error),
            warn_fmt: LogFmt::for_level(Level::Warn),
            info_fmt: LogFmt::for_level(Level::Info),
            debug_fmt: LogFmt::for_level(Level::Debug),
            trace_fmt: LogFmt::for_level(Level::Trace),
            custom_fmt: Vec::new(),
            filter,
        }
    }

    fn level_fmt(&mut self, level: Level) -> Option<&mut LogFmt> {
        match level {
            Level::Always => None,
            Level::Error => Some(&mut self.error_fmt),
            Level::Warn => Some(&mut self.warn_fmt),
            Level::Info => Some(&mut self.info_fmt),
            Level::Debug => Some(&mut self.debug_fmt),
            Level::Trace => Some(&mut self.trace_fmt),
        }
    }

    fn log(&mut self, target: &str, level: LevelFmt, msg: core::fmt::Arguments) -> Result<bool> {
        if !self.filter.enabled(target, level.level()) {
            return Ok(false)
        }
        let fmt = match level {
            LevelFmt::Error => &self.error_fmt,
            LevelFmt::Warn => &self.warn_fmt,
            LevelFmt::Info => &self.info_fmt,
            LevelFmt::Debug => &self.debug_fmt,
            LevelFmt::Trace => &self.trace_fmt,
            LevelFmt::Other(fmt, _) => self.custom_fmt
                .get(fmt.index())
                .ok_or(LogError::UnknownFormat(fmt))?,
        };
        fmt.write(&mut self.stderr, target, msg)?;
        Ok(true)
    }
}

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

#[inline(always)]
fn with_logger<R>(f: impl FnOnce(&mut Logger) -> R) -> Option<R> {
    let logger = LOGGER.get()?;
    let mut guard = logger
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    Some(f(&mut guard))
}

/// Installs the global logger with a filter read from `RUST_LOG`.
///
/// Calling this more than once keeps the first logger.
pub fn init() {
    init_with(Filter::from_env())
}

pub fn init_with(filter: Filter) {
    if LOGGER.get().is_some() { return }
    let _ = LOGGER.set(Mutex::new(Logger::new(filter)));
}

#[inline(always)]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Whether a record from `target` at `level` would be written.
pub fn enabled(target: &str, level: Level) -> bool {
    with_logger(|logger| logger.filter.enabled(target, level))
        .unwrap_or(false)
}

fn set_level_fmt(level: Level, f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    with_logger(|logger| {
        if let Some(fmt) = logger.level_fmt(level) {
            f(&mut LogFmtBuilder::new(fmt));
        }
    }).is_some()
}

#[inline(always)]
pub fn error_fmt(f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    set_level_fmt(Level::Error, f)
}

#[inline(always)]
pub fn warn_fmt(f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    set_level_fmt(Level::Warn, f)
}

#[inline(always)]
pub fn info_fmt(f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    set_level_fmt(Level::Info, f)
}

#[inline(always)]
pub fn debug_fmt(f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    set_level_fmt(Level::Debug, f)
}

#[inline(always)]
pub fn trace_fmt(f: impl FnOnce(&mut LogFmtBuilder)) -> bool {
    set_level_fmt(Level::Trace, f)
}

/// Registers an extra format, usable through [`LevelFmt::Other`].
#[inline(always)]
pub fn custom_fmt(fmt: LogFmt) -> Option<CustomFmt> {
    with_logger(|logger| {
        logger.custom_fmt.push(fmt);
        CustomFmt(logger.custom_fmt.len() - 1)
    })
}

/// Writes a record, returning whether anything was written.
#[inline(always)]
pub fn log(target: &str, level: LevelFmt, args: core::fmt::Arguments) -> Result<bool> {
    with_logger(|logger| logger.log(target, level, args))
        .unwrap_or(Ok(false))
}

#[macro_export]
macro_rules! error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Error, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! warn {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Warn, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! info {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Info, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! debug {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Debug, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}

#[macro_export]
macro_rules! trace {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::log(module_path!(), $crate::LevelFmt::Trace, format_args!($fmt, $($arg),*))
            .unwrap_or(false)
    };
}
