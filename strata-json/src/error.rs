//! Parse and print errors of the JSON backend.

use core::fmt;

use strata_value::{MappingError, MappingErrorKind};

/// JSON text that could not be parsed or printed.
#[derive(Debug)]
pub struct JsonError {
    inner: serde_json::Error,
}

impl JsonError {
    /// The 1-based line the error was found on, or 0 when printing.
    pub fn line(&self) -> usize {
        self.inner.line()
    }

    /// The 1-based column the error was found at, or 0 when printing.
    pub fn column(&self) -> usize {
        self.inner.column()
    }

    /// Whether the input ended before the document did.
    pub fn is_eof(&self) -> bool {
        self.inner.is_eof()
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid JSON: {}", self.inner)
    }
}

impl core::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl From<serde_json::Error> for JsonError {
    fn from(inner: serde_json::Error) -> Self {
        Self { inner }
    }
}

impl From<JsonError> for MappingError {
    fn from(err: JsonError) -> Self {
        MappingError::new(MappingErrorKind::DataCorrupted {
            reason: err.to_string(),
        })
    }
}
