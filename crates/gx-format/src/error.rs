//! Error type for format reading and writing.

use std::fmt;
use std::io;

/// What went wrong while reading or writing a gradient file.
#[derive(Debug)]
pub enum FormatError {
    /// Underlying filesystem failure.
    Io(io::Error),
    /// The file's contents do not match the format.
    Malformed(String),
    /// The file parsed but contained no usable color data.
    Empty,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Malformed(msg) => write!(f, "malformed gradient file: {msg}"),
            Self::Empty => write!(f, "gradient file contains no colors"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(_) | Self::Empty => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_descriptive() {
        let err = FormatError::Malformed("bad rgb triple".into());
        assert!(err.to_string().contains("bad rgb triple"));
        assert!(FormatError::Empty.to_string().contains("no colors"));
    }

    #[test]
    fn io_errors_convert() {
        let err: FormatError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, FormatError::Io(_)));
    }
}
