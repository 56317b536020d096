//! Errors raised while reading XML text.

use core::fmt;

use strata_value::{MappingError, MappingErrorKind};

/// XML text that could not be read into a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlError {
    /// The tokenizer rejected the input.
    Parse(String),
    /// A name was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// A closing tag had no matching opening tag, or the input ended inside
    /// an element.
    UnbalancedTags,
    /// More than one top-level element.
    MultipleRoots,
    /// No root element at all.
    UnexpectedEof,
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlError::Parse(msg) => write!(f, "XML parse error: {msg}"),
            XmlError::InvalidUtf8(e) => write!(f, "invalid UTF-8 in XML: {e}"),
            XmlError::UnbalancedTags => write!(f, "unbalanced XML tags"),
            XmlError::MultipleRoots => write!(f, "XML document has multiple root elements"),
            XmlError::UnexpectedEof => write!(f, "XML document has no root element"),
        }
    }
}

impl core::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            XmlError::InvalidUtf8(e) => Some(e),
            _ => None,
        }
    }
}

impl From<XmlError> for MappingError {
    fn from(err: XmlError) -> Self {
        MappingError::new(MappingErrorKind::DataCorrupted {
            reason: err.to_string(),
        })
    }
}
