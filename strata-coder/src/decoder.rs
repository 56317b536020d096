//! The decoding frame stack and its three container shapes.

use std::borrow::Cow;

use strata_value::{
    MappingError, MappingErrorKind, MappingKey, Path, Primitive, StructuredValue, Value,
    ValueKind, child, decode_scalar, to_value,
};

use crate::tracing_macros::trace;
use crate::{CoderOptions, Decode};

struct Frame<'a, S: StructuredValue> {
    value: Cow<'a, S>,
    claimed: bool,
}

/// Reads a typed value out of a tree, one nesting level at a time.
///
/// Each level hands out exactly one container: [`keyed`](Self::keyed),
/// [`sequential`](Self::sequential) or [`single_value`](Self::single_value).
/// Asking twice at the same level fails with
/// [`MappingErrorKind::DataCorrupted`].
pub struct Decoder<'a, S: StructuredValue> {
    frames: Vec<Frame<'a, S>>,
    path: Vec<MappingKey>,
    options: CoderOptions,
}

impl<'a, S: StructuredValue> Decoder<'a, S> {
    /// A decoder over `root`.
    pub fn new(root: &'a S, options: CoderOptions) -> Self {
        Self::at_path(Cow::Borrowed(root), Vec::new(), options)
    }

    fn at_path(value: Cow<'a, S>, path: Vec<MappingKey>, options: CoderOptions) -> Self {
        Self {
            frames: vec![Frame {
                value,
                claimed: false,
            }],
            path,
            options,
        }
    }

    /// The keys leading from the root to the current level.
    pub fn coding_path(&self) -> &[MappingKey] {
        &self.path
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> CoderOptions {
        self.options
    }

    /// Whether the current level holds null.
    pub fn is_null(&self) -> bool {
        self.top().value.is_null()
    }

    /// Read the current level as an object.
    pub fn keyed(&mut self) -> Result<KeyedDecoder<'_, 'a, S>, MappingError> {
        match self.top().value.kind() {
            ValueKind::Object => {}
            ValueKind::Null => return Err(self.error(MappingErrorKind::ValueNotFound)),
            actual => {
                return Err(self.error(MappingErrorKind::IncompatibleType {
                    expected: "object",
                    actual,
                }));
            }
        }
        let depth = self.claim("keyed")?;
        Ok(KeyedDecoder {
            decoder: self,
            depth,
        })
    }

    /// Read the current level as an array.
    pub fn sequential(&mut self) -> Result<SequentialDecoder<'_, 'a, S>, MappingError> {
        let value = &self.top().value;
        let count = match value.items() {
            Some(items) => items.len(),
            None if value.is_null() => return Err(self.error(MappingErrorKind::ValueNotFound)),
            None => {
                let actual = value.kind();
                return Err(self.error(MappingErrorKind::IncompatibleType {
                    expected: "array",
                    actual,
                }));
            }
        };
        let depth = self.claim("sequential")?;
        Ok(SequentialDecoder {
            decoder: self,
            depth,
            count,
            index: 0,
        })
    }

    /// Read the current level as one value.
    pub fn single_value(&mut self) -> Result<SingleValueDecoder<'_, 'a, S>, MappingError> {
        let depth = self.claim("single value")?;
        Ok(SingleValueDecoder {
            decoder: self,
            depth,
        })
    }

    fn top(&self) -> &Frame<'a, S> {
        &self.frames[self.frames.len() - 1]
    }

    fn claim(&mut self, shape: &'static str) -> Result<usize, MappingError> {
        let depth = self.frames.len() - 1;
        if self.frames[depth].claimed {
            return Err(self.error(MappingErrorKind::DataCorrupted {
                reason: format!("a container was already requested here, cannot open a {shape} one"),
            }));
        }
        self.frames[depth].claimed = true;
        trace!(path = %Path::from(self.path.as_slice()), shape, "decode container");
        Ok(depth)
    }

    fn error(&self, kind: MappingErrorKind) -> MappingError {
        MappingError::new(kind).at(self.path.as_slice())
    }

    fn error_at(&self, key: MappingKey, kind: MappingErrorKind) -> MappingError {
        let mut path = Path::from(self.path.as_slice());
        path.push(key);
        MappingError::new(kind).at(path)
    }

    fn child(&self, depth: usize, key: &MappingKey) -> Result<Option<Cow<'a, S>>, MappingError> {
        let found = match &self.frames[depth].value {
            Cow::Borrowed(node) => child(*node, key),
            Cow::Owned(node) => {
                child(node, key).map(|found| found.map(|c| Cow::Owned(c.into_owned())))
            }
        };
        found.map_err(|kind| self.error_at(key.clone(), kind))
    }

    fn with_frame<R>(
        &mut self,
        key: Option<MappingKey>,
        value: Cow<'a, S>,
        body: impl FnOnce(&mut Self) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let keyed = key.is_some();
        if let Some(key) = key {
            self.path.push(key);
        }
        self.frames.push(Frame {
            value,
            claimed: false,
        });
        trace!(path = %Path::from(self.path.as_slice()), "enter");

        let result = body(self).map_err(|err| {
            if err.path.is_empty() {
                err.at(self.path.as_slice())
            } else {
                err
            }
        });

        self.frames.pop();
        if keyed {
            self.path.pop();
        }
        result
    }
}

/// Named-field access to an object level.
pub struct KeyedDecoder<'d, 'a, S: StructuredValue> {
    decoder: &'d mut Decoder<'a, S>,
    depth: usize,
}

impl<'d, 'a, S: StructuredValue> KeyedDecoder<'d, 'a, S> {
    /// The keys leading to this object.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.decoder.coding_path()
    }

    /// The wire keys present in this object.
    pub fn all_keys(&self) -> Vec<String> {
        self.decoder.frames[self.depth].value.field_names()
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        let wire = self.decoder.options.naming.apply(key);
        matches!(
            self.decoder.child(self.depth, &MappingKey::from(&*wire)),
            Ok(Some(_))
        )
    }

    /// Decode the value under `key`.
    pub fn decode<T: Decode>(&mut self, key: &str) -> Result<T, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        self.decode_wire(&wire)
    }

    pub(crate) fn decode_wire<T: Decode>(&mut self, wire: &str) -> Result<T, MappingError> {
        let (key, value) = self.required(wire)?;
        self.decoder.with_frame(Some(key), value, T::decode)
    }

    /// Decode the value under `key`, or `None` when it is missing or null.
    pub fn decode_optional<T: Decode>(&mut self, key: &str) -> Result<Option<T>, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        let key = MappingKey::from(wire);
        match self.decoder.child(self.depth, &key)? {
            Some(value) if !value.is_null() => {
                self.decoder.with_frame(Some(key), value, T::decode).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Whether the value under `key` is null.
    pub fn decode_nil(&mut self, key: &str) -> Result<bool, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        let (_, value) = self.required(&wire)?;
        Ok(value.is_null())
    }

    /// Read the object under `key`.
    pub fn nested_keyed<R>(
        &mut self,
        key: &str,
        body: impl FnOnce(&mut KeyedDecoder<'_, 'a, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        let (key, value) = self.required(&wire)?;
        self.decoder
            .with_frame(Some(key), value, |decoder| body(&mut decoder.keyed()?))
    }

    /// Read the array under `key`.
    pub fn nested_sequential<R>(
        &mut self,
        key: &str,
        body: impl FnOnce(&mut SequentialDecoder<'_, 'a, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        let (key, value) = self.required(&wire)?;
        self.decoder
            .with_frame(Some(key), value, |decoder| body(&mut decoder.sequential()?))
    }

    /// A standalone decoder over the value under `"super"`.
    pub fn delegate(&self) -> Result<Decoder<'a, S>, MappingError> {
        self.delegate_for("super")
    }

    /// A standalone decoder over the value under `key`; null when missing.
    pub fn delegate_for(&self, key: &str) -> Result<Decoder<'a, S>, MappingError> {
        let wire = self.decoder.options.naming.apply(key).into_owned();
        let key = MappingKey::from(wire);
        let value = self
            .decoder
            .child(self.depth, &key)?
            .unwrap_or_else(|| Cow::Owned(S::null()));
        let mut path = self.decoder.path.clone();
        path.push(key);
        Ok(Decoder::at_path(value, path, self.decoder.options))
    }

    fn required(&self, wire: &str) -> Result<(MappingKey, Cow<'a, S>), MappingError> {
        let key = MappingKey::from(wire);
        match self.decoder.child(self.depth, &key)? {
            Some(value) => Ok((key, value)),
            None => Err(self.decoder.error_at(
                key,
                MappingErrorKind::KeyNotFound {
                    key: wire.to_owned(),
                },
            )),
        }
    }
}

/// Ordered access to an array level through a cursor.
pub struct SequentialDecoder<'d, 'a, S: StructuredValue> {
    decoder: &'d mut Decoder<'a, S>,
    depth: usize,
    count: usize,
    index: usize,
}

impl<'d, 'a, S: StructuredValue> SequentialDecoder<'d, 'a, S> {
    /// The keys leading to this array.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.decoder.coding_path()
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Index of the next element to read.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Whether every element has been read.
    pub fn is_at_end(&self) -> bool {
        self.index >= self.count
    }

    /// Decode the next element. The cursor only moves on success.
    pub fn decode<T: Decode>(&mut self) -> Result<T, MappingError> {
        let (key, value) = self.next_item()?;
        let decoded = self.decoder.with_frame(Some(key), value, T::decode)?;
        self.index += 1;
        Ok(decoded)
    }

    /// Decode the next element, with null read as `None`.
    pub fn decode_optional<T: Decode>(&mut self) -> Result<Option<T>, MappingError> {
        let (key, value) = self.next_item()?;
        let decoded = if value.is_null() {
            None
        } else {
            Some(self.decoder.with_frame(Some(key), value, T::decode)?)
        };
        self.index += 1;
        Ok(decoded)
    }

    /// Consume the next element if it is null.
    pub fn decode_nil(&mut self) -> Result<bool, MappingError> {
        let (_, value) = self.next_item()?;
        let is_null = value.is_null();
        if is_null {
            self.index += 1;
        }
        Ok(is_null)
    }

    /// Read the next element as an object.
    pub fn nested_keyed<R>(
        &mut self,
        body: impl FnOnce(&mut KeyedDecoder<'_, 'a, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let (key, value) = self.next_item()?;
        let result = self
            .decoder
            .with_frame(Some(key), value, |decoder| body(&mut decoder.keyed()?))?;
        self.index += 1;
        Ok(result)
    }

    /// Read the next element as an array.
    pub fn nested_sequential<R>(
        &mut self,
        body: impl FnOnce(&mut SequentialDecoder<'_, 'a, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let (key, value) = self.next_item()?;
        let result = self
            .decoder
            .with_frame(Some(key), value, |decoder| body(&mut decoder.sequential()?))?;
        self.index += 1;
        Ok(result)
    }

    fn next_item(&self) -> Result<(MappingKey, Cow<'a, S>), MappingError> {
        let key = MappingKey::Index(self.index);
        if self.is_at_end() {
            return Err(self.decoder.error_at(
                key,
                MappingErrorKind::OutOfBounds {
                    index: self.index,
                    len: self.count,
                },
            ));
        }
        match self.decoder.child(self.depth, &key)? {
            Some(value) => Ok((key, value)),
            None => Err(self
                .decoder
                .error_at(key, MappingErrorKind::ValueNotFound)),
        }
    }
}

/// Access to a level holding one value.
pub struct SingleValueDecoder<'d, 'a, S: StructuredValue> {
    decoder: &'d mut Decoder<'a, S>,
    depth: usize,
}

impl<'d, 'a, S: StructuredValue> SingleValueDecoder<'d, 'a, S> {
    /// The keys leading to this value.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.decoder.coding_path()
    }

    /// Whether the value is null.
    pub fn decode_nil(&self) -> bool {
        self.node().is_null()
    }

    /// Coerce the value to a primitive.
    pub fn decode_primitive<P: Primitive>(&self) -> Result<P, MappingError> {
        let node = self.node();
        if node.is_null() {
            return Err(self.decoder.error(MappingErrorKind::ValueNotFound));
        }
        decode_scalar::<P, S>(node).map_err(|kind| {
            trace!(path = %Path::from(self.decoder.path.as_slice()), error = %kind, "coercion failed");
            self.decoder.error(kind)
        })
    }

    /// Decode the value as `T`, which gets a fresh level of its own.
    pub fn decode<T: Decode>(&mut self) -> Result<T, MappingError> {
        let value = self.decoder.frames[self.depth].value.clone();
        self.decoder.with_frame(None, value, T::decode)
    }

    pub(crate) fn decode_tree(&self) -> Result<Value, MappingError> {
        to_value(self.node()).map_err(|err| err.with_prefix(&self.decoder.path))
    }

    fn node(&self) -> &S {
        &self.decoder.frames[self.depth].value
    }
}
