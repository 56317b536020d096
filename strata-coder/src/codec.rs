//! The `Decode`/`Encode` traits and their implementations for std types.

use std::collections::{BTreeMap, HashMap};

use core::hash::BuildHasher;

use strata_value::{MappingError, StructuredValue, Value, from_value};

use crate::{Decoder, Encoder};

/// A type that reads itself out of a [`Decoder`].
///
/// Implementations ask the decoder for one container and read their fields
/// through it:
///
/// ```
/// use strata_coder::{Decode, Decoder};
/// use strata_value::{MappingError, StructuredValue};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Decode for Point {
///     fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
///         let mut fields = decoder.keyed()?;
///         Ok(Point {
///             x: fields.decode("x")?,
///             y: fields.decode("y")?,
///         })
///     }
/// }
/// ```
pub trait Decode: Sized {
    /// Read a value at the decoder's current level.
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError>;
}

/// A type that writes itself into an [`Encoder`].
pub trait Encode {
    /// Write this value at the encoder's current level.
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError>;
}

macro_rules! primitive_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
                    decoder.single_value()?.decode_primitive()
                }
            }

            impl Encode for $ty {
                fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
                    encoder.single_value()?.encode_primitive(self)
                }
            }
        )*
    };
}

primitive_codec!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String,
);

impl Encode for str {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        encoder.single_value()?.encode_node(S::string(self.to_owned()))
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        if decoder.is_null() {
            return Ok(None);
        }
        T::decode(decoder).map(Some)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single_value()?.encode_nil(),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        let mut items = decoder.sequential()?;
        let mut values = Vec::with_capacity(items.count());
        while !items.is_at_end() {
            values.push(items.decode()?);
        }
        Ok(values)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        let mut items = encoder.sequential()?;
        for value in self {
            items.encode(value)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        T::decode(decoder).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        let mut fields = decoder.keyed()?;
        let mut map = BTreeMap::new();
        for key in fields.all_keys() {
            let value = fields.decode_wire(&key)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        let mut fields = encoder.keyed()?;
        for (key, value) in self {
            fields.encode_wire(key.clone(), value)?;
        }
        Ok(())
    }
}

impl<T: Decode, H: BuildHasher + Default> Decode for HashMap<String, T, H> {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        let mut fields = decoder.keyed()?;
        let keys = fields.all_keys();
        let mut map = HashMap::with_capacity_and_hasher(keys.len(), H::default());
        for key in keys {
            let value = fields.decode_wire(&key)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T: Encode, H> Encode for HashMap<String, T, H> {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        let mut fields = encoder.keyed()?;
        for (key, value) in self {
            fields.encode_wire(key.clone(), value)?;
        }
        Ok(())
    }
}

impl Decode for Value {
    fn decode<S: StructuredValue>(decoder: &mut Decoder<'_, S>) -> Result<Self, MappingError> {
        decoder.single_value()?.decode_tree()
    }
}

impl Encode for Value {
    fn encode<S: StructuredValue>(&self, encoder: &mut Encoder<S>) -> Result<(), MappingError> {
        let mut single = encoder.single_value()?;
        let node = from_value(self.clone())
            .map_err(|err| err.with_prefix(single.coding_path()))?;
        single.encode_node(node)
    }
}
