//! Errors raised while navigating, decoding and encoding trees.

use core::fmt;

use crate::{MappingKey, Path, Value, ValueKind};

/// A mapping failure and the path at which it happened.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingError {
    /// What went wrong.
    pub kind: MappingErrorKind,
    /// Where it went wrong, relative to the tree handed to the failing call.
    pub path: Path,
}

impl MappingError {
    /// Create an error at the root path.
    pub fn new(kind: MappingErrorKind) -> Self {
        Self {
            kind,
            path: Path::new(),
        }
    }

    /// Create a user-defined error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(MappingErrorKind::UserDefined {
            message: message.into(),
        })
    }

    /// Replace the path of this error.
    pub fn at(mut self, path: impl Into<Path>) -> Self {
        self.path = path.into();
        self
    }

    /// Prepend one key to the path.
    pub fn with_path(mut self, key: MappingKey) -> Self {
        self.path.prepend(key);
        self
    }

    /// Prepend several keys to the path.
    pub fn with_prefix(mut self, keys: &[MappingKey]) -> Self {
        self.path.prepend_all(keys);
        self
    }

    /// Whether the value (or the key holding it) was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            MappingErrorKind::ValueNotFound | MappingErrorKind::KeyNotFound { .. }
        )
    }

    /// Whether a value was present but had the wrong shape or range.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self.kind,
            MappingErrorKind::TypeMismatch { .. }
                | MappingErrorKind::IncompatibleType { .. }
                | MappingErrorKind::NumberOutOfRange { .. }
                | MappingErrorKind::CannotRepresentAsArray
        )
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path, self.kind)
        }
    }
}

impl core::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            MappingErrorKind::CannotSet(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl From<MappingErrorKind> for MappingError {
    fn from(kind: MappingErrorKind) -> Self {
        MappingError::new(kind)
    }
}

/// The specific kind of mapping failure.
#[derive(Clone, Debug, PartialEq)]
pub enum MappingErrorKind {
    /// A required value is absent or null.
    ValueNotFound,
    /// A value is present but of the wrong kind.
    TypeMismatch {
        /// What the reader asked for.
        expected: &'static str,
        /// What the tree holds.
        got: ValueKind,
    },
    /// A keyed container has no entry for a key.
    KeyNotFound {
        /// The wire key that was looked up.
        key: String,
    },
    /// The tree cannot be read or written as requested.
    DataCorrupted {
        /// Human-readable explanation.
        reason: String,
    },
    /// No enumeration case has this raw value.
    CannotInitializeFromRawValue {
        /// The raw value that was read.
        raw: Value,
    },
    /// The backend has no way to store an array here.
    CannotRepresentAsArray,
    /// A container was requested over a node of another shape.
    IncompatibleType {
        /// The container shape that was requested.
        expected: &'static str,
        /// What the tree holds.
        actual: ValueKind,
    },
    /// An array write addressed a position past its end.
    OutOfBounds {
        /// The requested position.
        index: usize,
        /// The array length.
        len: usize,
    },
    /// A number does not fit the target type exactly.
    NumberOutOfRange {
        /// The number as read.
        value: String,
        /// The target type.
        target: &'static str,
    },
    /// Writing into the destination tree failed.
    CannotSet(Box<MappingError>),
    /// Raised by mapping code outside this crate.
    UserDefined {
        /// The user's message.
        message: String,
    },
}

impl fmt::Display for MappingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingErrorKind::ValueNotFound => write!(f, "value not found"),
            MappingErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            MappingErrorKind::KeyNotFound { key } => write!(f, "key `{key}` not found"),
            MappingErrorKind::DataCorrupted { reason } => write!(f, "data corrupted: {reason}"),
            MappingErrorKind::CannotInitializeFromRawValue { raw } => {
                write!(f, "no case matches raw value {raw}")
            }
            MappingErrorKind::CannotRepresentAsArray => write!(f, "cannot represent as array"),
            MappingErrorKind::IncompatibleType { expected, actual } => {
                write!(f, "incompatible type: expected {expected}, got {actual}")
            }
            MappingErrorKind::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for array of length {len}")
            }
            MappingErrorKind::NumberOutOfRange { value, target } => {
                write!(f, "number {value} out of range for {target}")
            }
            MappingErrorKind::CannotSet(inner) => write!(f, "cannot set value: {inner}"),
            MappingErrorKind::UserDefined { message } => write!(f, "{message}"),
        }
    }
}
