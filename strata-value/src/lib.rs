#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod convert;
mod error;
mod impls_serde_json;
mod key;
mod macros;
mod navigate;
mod primitive;
mod raw;
mod structured;
mod value;

pub use convert::{from_value, to_value};
pub use error::{MappingError, MappingErrorKind};
pub use key::{KeySpace, MappingKey, Path};
pub use navigate::{child, get, remove, set, set_at};
pub use primitive::{Primitive, ScalarKind, decode_scalar, encode_scalar};
pub use raw::RawRepresentable;
pub use structured::StructuredValue;
pub use value::{Object, Value, ValueKind};
