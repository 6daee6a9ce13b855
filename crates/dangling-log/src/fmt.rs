//! Record layouts.
//!
//! A [`LogFmt`] is a sequence of segments: fixed text, the record's target
//! module or the message itself, each with an optional color.

use std::io::{self, Write};

use termcolor::{ColorSpec, WriteColor};

use compact_str::CompactString;

use crate::Level;

#[derive(Default, Clone)]
pub struct LogFmt {
    segments: Vec<SegmentSpec>,
}

impl LogFmt {

    /// `[level] target: message`, with the level tag colored.
    pub fn for_level(level: Level) -> Self {
        let mut fmt = Self::default();
        LogFmtBuilder::new(&mut fmt)
            .text("[", |spec| spec)
            .text(level.as_str(), |spec| spec.with_color_spec(|color| {
                color.set_fg(level.color()).set_bold(true);
            }))
            .text("] ", |spec| spec)
            .target(|spec| spec.with_color_spec(|color| {
                color.set_dimmed(true);
            }))
            .text(": ", |spec| spec)
            .message(|spec| spec);
        fmt
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    /// Writes one record followed by a newline.
    pub fn write(
        &self,
        out: &mut impl WriteColor,
        target: &str,
        msg: core::fmt::Arguments,
    ) -> io::Result<()>
    {
        for segment in self {
            let spec = segment.spec();
            if let Some(color_spec) = &spec.color_spec {
                out.set_color(color_spec)?;
            }
            match segment {
                SegmentSpec::Message(_) => write!(out, "{}", msg)?,
                SegmentSpec::Target(_) => out.write_all(target.as_bytes())?,
                SegmentSpec::Text(text, _) => out.write_all(text.as_bytes())?,
            }
            if spec.color_spec.is_some() {
                out.reset()?;
            }
        }
        out.write_all(b"\n")
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = core::slice::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Default, Clone)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, mut f: impl FnMut(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

#[derive(Clone)]
pub enum SegmentSpec {
    Message(LogSpec),
    Target(LogSpec),
    Text(CompactString, LogSpec),
}

impl SegmentSpec {

    #[inline(always)]
    fn spec(&self) -> &LogSpec {
        match self {
            Self::Message(spec) | Self::Target(spec) | Self::Text(_, spec) => spec,
        }
    }
}

pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    /// Clears `fmt` and starts building it from scratch.
    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, mut f: impl FnMut(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Message(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn target(&mut self, mut f: impl FnMut(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Target(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, mut f: impl FnMut(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.segments.push(SegmentSpec::Text(CompactString::new(text), f(Default::default())));
        self
    }
}
