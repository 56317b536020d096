//! What can be read from, and written to, a single node.

use strata_value::{
    MappingError, MappingErrorKind, MappingKey, Primitive, RawRepresentable, StructuredValue,
    Value, decode_scalar, encode_scalar,
};

use crate::{
    ContextInputMappable, ContextOutputMappable, ContextualMapper, ContextualOutMapper,
    InputMappable, Mapper, OutMapper, OutputMappable,
};

/// A value that can be read from one node of a tree.
pub trait MapDecode: Sized {
    /// Read a value from `node`.
    fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError>;

    /// Whether `node` counts as a missing value for this type.
    fn is_absent<S: StructuredValue>(node: &S) -> bool {
        node.is_null()
    }
}

/// A value that can be written as one node of a tree.
pub trait MapEncode {
    /// Build the node for this value.
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError>;
}

/// A value that can be read from one node given a context.
pub trait MapDecodeInContext<C>: Sized {
    /// Read a value from `node`, passing `context` to nested reads.
    fn map_decode_in_context<S: StructuredValue>(node: &S, context: &C) -> Result<Self, MappingError>;

    /// Whether `node` counts as a missing value for this type.
    fn is_absent<S: StructuredValue>(node: &S) -> bool {
        node.is_null()
    }
}

/// A value that can be written as one node given a context.
pub trait MapEncodeInContext<C> {
    /// Build the node for this value, passing `context` to nested writes.
    fn map_encode_in_context<S: StructuredValue>(&self, context: &C) -> Result<S, MappingError>;
}

macro_rules! primitive_elements {
    ($($ty:ty),*) => {
        $(
            impl MapDecode for $ty {
                fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError> {
                    decode_scalar::<$ty, S>(node).map_err(MappingError::new)
                }
            }

            impl MapEncode for $ty {
                fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
                    encode_scalar(self).map_err(MappingError::new)
                }
            }
        )*
    };
}

primitive_elements!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String
);

impl MapEncode for str {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        Ok(S::string(self.to_owned()))
    }
}

impl MapDecode for Value {
    fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError> {
        strata_value::to_value(node)
    }
}

impl MapEncode for Value {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        strata_value::from_value(self.clone())
    }
}

fn array_items<S: StructuredValue>(
    node: &S,
) -> Result<std::borrow::Cow<'_, [S]>, MappingError> {
    node.items().ok_or_else(|| {
        MappingError::new(MappingErrorKind::TypeMismatch {
            expected: "array",
            got: node.kind(),
        })
    })
}

/// Decode every item of an array node with `decode`, tagging failures with
/// the item's index.
pub(crate) fn decode_items<S, T>(
    node: &S,
    is_absent: impl Fn(&S) -> bool,
    mut decode: impl FnMut(&S) -> Result<T, MappingError>,
) -> Result<Vec<T>, MappingError>
where
    S: StructuredValue,
{
    let items = array_items(node)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let result = if is_absent(item) {
                Err(MappingError::new(MappingErrorKind::ValueNotFound))
            } else {
                decode(item)
            };
            result.map_err(|err| err.with_path(MappingKey::Index(index)))
        })
        .collect()
}

/// Encode every element with `encode` into an array node.
pub(crate) fn encode_items<S, T>(
    values: &[T],
    mut encode: impl FnMut(&T) -> Result<S, MappingError>,
) -> Result<S, MappingError>
where
    S: StructuredValue,
{
    values
        .iter()
        .enumerate()
        .map(|(index, value)| encode(value).map_err(|err| err.with_path(MappingKey::Index(index))))
        .collect::<Result<Vec<S>, _>>()
        .map(S::array)
}

impl<T: MapDecode> MapDecode for Vec<T> {
    fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError> {
        decode_items(node, T::is_absent, T::map_decode)
    }

    fn is_absent<S: StructuredValue>(node: &S) -> bool {
        node.is_null() && node.items().is_none()
    }
}

impl<T: MapEncode> MapEncode for Vec<T> {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        self.as_slice().map_encode()
    }
}

impl<T: MapEncode> MapEncode for [T] {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        encode_items(self, T::map_encode)
    }
}

impl<T: MapDecode> MapDecode for Option<T> {
    fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError> {
        if T::is_absent(node) {
            Ok(None)
        } else {
            T::map_decode(node).map(Some)
        }
    }

    fn is_absent<S: StructuredValue>(_node: &S) -> bool {
        false
    }
}

impl<T: MapEncode> MapEncode for Option<T> {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        match self {
            Some(value) => value.map_encode(),
            None => Ok(S::null()),
        }
    }
}

impl<T: InputMappable> MapDecode for T {
    fn map_decode<S: StructuredValue>(node: &S) -> Result<Self, MappingError> {
        T::from_mapper(&Mapper::new(node))
    }
}

impl<T: OutputMappable> MapEncode for T {
    fn map_encode<S: StructuredValue>(&self) -> Result<S, MappingError> {
        let mut mapper = OutMapper::of(S::object());
        self.to_mapper(&mut mapper)?;
        Ok(mapper.into_destination())
    }
}

impl<T: ContextInputMappable> MapDecodeInContext<T::Context> for T {
    fn map_decode_in_context<S: StructuredValue>(
        node: &S,
        context: &T::Context,
    ) -> Result<Self, MappingError> {
        T::from_contextual_mapper(&ContextualMapper::new(node, context))
    }
}

impl<C, T: MapDecodeInContext<C>> MapDecodeInContext<C> for Vec<T> {
    fn map_decode_in_context<S: StructuredValue>(node: &S, context: &C) -> Result<Self, MappingError> {
        decode_items(node, T::is_absent, |item| T::map_decode_in_context(item, context))
    }

    fn is_absent<S: StructuredValue>(node: &S) -> bool {
        node.is_null() && node.items().is_none()
    }
}

impl<C, T: MapDecodeInContext<C>> MapDecodeInContext<C> for Option<T> {
    fn map_decode_in_context<S: StructuredValue>(node: &S, context: &C) -> Result<Self, MappingError> {
        if T::is_absent(node) {
            Ok(None)
        } else {
            T::map_decode_in_context(node, context).map(Some)
        }
    }

    fn is_absent<S: StructuredValue>(_node: &S) -> bool {
        false
    }
}

impl<T: ContextOutputMappable> MapEncodeInContext<T::Context> for T {
    fn map_encode_in_context<S: StructuredValue>(&self, context: &T::Context) -> Result<S, MappingError> {
        let mut mapper = ContextualOutMapper::of(S::object(), context);
        self.to_contextual_mapper(&mut mapper)?;
        Ok(mapper.into_destination())
    }
}

impl<C, T: MapEncodeInContext<C>> MapEncodeInContext<C> for Vec<T> {
    fn map_encode_in_context<S: StructuredValue>(&self, context: &C) -> Result<S, MappingError> {
        self.as_slice().map_encode_in_context(context)
    }
}

impl<C, T: MapEncodeInContext<C>> MapEncodeInContext<C> for [T] {
    fn map_encode_in_context<S: StructuredValue>(&self, context: &C) -> Result<S, MappingError> {
        encode_items(self, |value| value.map_encode_in_context(context))
    }
}

impl<C, T: MapEncodeInContext<C>> MapEncodeInContext<C> for Option<T> {
    fn map_encode_in_context<S: StructuredValue>(&self, context: &C) -> Result<S, MappingError> {
        match self {
            Some(value) => value.map_encode_in_context(context),
            None => Ok(S::null()),
        }
    }
}

/// Read a raw-value enumeration from `node`.
pub(crate) fn decode_raw<T: RawRepresentable, S: StructuredValue>(
    node: &S,
) -> Result<T, MappingError> {
    let raw = decode_scalar::<T::Raw, S>(node).map_err(MappingError::new)?;
    if let Some(value) = T::from_raw_value(&raw) {
        return Ok(value);
    }
    let raw = raw.to_scalar().map_err(MappingError::new)?;
    Err(MappingError::new(MappingErrorKind::CannotInitializeFromRawValue { raw }))
}

/// Write a raw-value enumeration as a leaf.
pub(crate) fn encode_raw<T: RawRepresentable, S: StructuredValue>(
    value: &T,
) -> Result<S, MappingError> {
    encode_scalar(&value.raw_value()).map_err(MappingError::new)
}
