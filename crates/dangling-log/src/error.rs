use crate::CustomFmt;

#[derive(Debug)]
pub enum LogError {
    UnknownFormat(CustomFmt),
    IoError(std::io::Error),
}

impl core::fmt::Display for LogError {

    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownFormat(fmt) => write!(f, "unknown custom format {}", fmt.index()),
            Self::IoError(_) => write!(f, "IO error"),
        }
    }
}

impl core::error::Error for LogError {

    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::UnknownFormat(_) => None,
            Self::IoError(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LogError {

    fn from(value: std::io::Error) -> Self {
        Self::IoError(value)
    }
}
