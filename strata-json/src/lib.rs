#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod tracing_macros;

mod error;

pub use error::JsonError;
pub use serde_json::Value as Json;

use strata_value::{MappingError, Value};

use crate::tracing_macros::trace;

/// Parse JSON text into a tree.
pub fn from_str(input: &str) -> Result<Json, JsonError> {
    trace!(len = input.len(), "parsing JSON");
    Ok(serde_json::from_str(input)?)
}

/// Parse JSON bytes into a tree.
pub fn from_slice(input: &[u8]) -> Result<Json, JsonError> {
    trace!(len = input.len(), "parsing JSON");
    Ok(serde_json::from_slice(input)?)
}

/// Print a tree as compact JSON.
pub fn to_string(tree: &Json) -> Result<String, JsonError> {
    Ok(serde_json::to_string(tree)?)
}

/// Print a tree as indented JSON.
pub fn to_string_pretty(tree: &Json) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Convert a JSON tree into an engine [`Value`].
pub fn to_value(tree: &Json) -> Result<Value, MappingError> {
    strata_value::to_value(tree)
}

/// Convert an engine [`Value`] into a JSON tree.
///
/// Fails for NaN and infinite doubles, which JSON cannot hold.
pub fn from_value(value: Value) -> Result<Json, MappingError> {
    strata_value::from_value(value)
}
