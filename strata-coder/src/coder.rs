//! Entry points tying the decoder and encoder to a set of options.

use strata_value::{MappingError, StructuredValue, Value};

use crate::tracing_macros::trace_span;
use crate::{CoderOptions, Decode, Decoder, Encode, Encoder};

/// Decodes and encodes [`Decode`]/[`Encode`] types against any tree backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coder {
    options: CoderOptions,
}

impl Coder {
    /// A coder using `options` for every call.
    pub const fn new(options: CoderOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub const fn options(&self) -> CoderOptions {
        self.options
    }

    /// Decode a `T` from the root of `tree`.
    pub fn decode<T: Decode, S: StructuredValue>(&self, tree: &S) -> Result<T, MappingError> {
        trace_span!("decode", ty = core::any::type_name::<T>());
        T::decode(&mut Decoder::new(tree, self.options))
    }

    /// Decode a `T` from an engine [`Value`].
    pub fn decode_value<T: Decode>(&self, value: &Value) -> Result<T, MappingError> {
        self.decode(value)
    }

    /// Encode `value` into a new tree.
    pub fn encode<S: StructuredValue, T: Encode + ?Sized>(&self, value: &T) -> Result<S, MappingError> {
        trace_span!("encode", ty = core::any::type_name::<T>());
        let mut encoder = Encoder::new(self.options);
        value.encode(&mut encoder)?;
        encoder.into_value()
    }

    /// Encode `value` into an engine [`Value`].
    pub fn encode_value<T: Encode + ?Sized>(&self, value: &T) -> Result<Value, MappingError> {
        self.encode(value)
    }
}

/// Decode a `T` from `tree` with default options.
pub fn from_tree<T: Decode, S: StructuredValue>(tree: &S) -> Result<T, MappingError> {
    Coder::default().decode(tree)
}

/// Encode `value` into a tree of type `S` with default options.
pub fn to_tree<S: StructuredValue, T: Encode + ?Sized>(value: &T) -> Result<S, MappingError> {
    Coder::default().encode(value)
}

/// Decode a `T` from an engine [`Value`] with default options.
pub fn from_value<T: Decode>(value: &Value) -> Result<T, MappingError> {
    Coder::default().decode_value(value)
}

/// Encode `value` into an engine [`Value`] with default options.
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Result<Value, MappingError> {
    Coder::default().encode_value(value)
}
