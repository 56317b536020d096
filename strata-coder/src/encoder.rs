//! The encoding builder stack and its three container shapes.

use core::ops::{Deref, DerefMut};

use strata_value::{
    MappingError, MappingErrorKind, MappingKey, Path, Primitive, StructuredValue, encode_scalar,
};

use crate::tracing_macros::trace;
use crate::{CoderOptions, Encode};

enum Slot<S> {
    Empty,
    Keyed(S),
    Sequential { array: S, count: usize },
    Single(Option<S>),
}

impl<S> Slot<S> {
    fn into_value(self) -> Option<S> {
        match self {
            Slot::Empty => None,
            Slot::Keyed(object) => Some(object),
            Slot::Sequential { array, .. } => Some(array),
            Slot::Single(value) => value,
        }
    }
}

fn closed(shape: &str) -> MappingErrorKind {
    MappingErrorKind::DataCorrupted {
        reason: format!("the {shape} container is no longer open"),
    }
}

/// Builds a tree from a typed value, one nesting level at a time.
///
/// Like [`Decoder`](crate::Decoder), each level hands out exactly one
/// container. A nested level's value is written into its parent when the
/// closure that fills it returns.
pub struct Encoder<S: StructuredValue> {
    slots: Vec<Slot<S>>,
    path: Vec<MappingKey>,
    options: CoderOptions,
}

impl<S: StructuredValue> Encoder<S> {
    /// An encoder with nothing written yet.
    pub fn new(options: CoderOptions) -> Self {
        Self::at_path(Vec::new(), options)
    }

    fn at_path(path: Vec<MappingKey>, options: CoderOptions) -> Self {
        Self {
            slots: vec![Slot::Empty],
            path,
            options,
        }
    }

    /// The keys leading from the root to the current level.
    pub fn coding_path(&self) -> &[MappingKey] {
        &self.path
    }

    /// The options this encoder was built with.
    pub fn options(&self) -> CoderOptions {
        self.options
    }

    /// Write the current level as an object.
    pub fn keyed(&mut self) -> Result<KeyedEncoder<'_, S>, MappingError> {
        let depth = self.claim(Slot::Keyed(S::object()), "keyed")?;
        Ok(KeyedEncoder {
            encoder: self,
            depth,
        })
    }

    /// Write the current level as an array.
    pub fn sequential(&mut self) -> Result<SequentialEncoder<'_, S>, MappingError> {
        let slot = Slot::Sequential {
            array: S::array(Vec::new()),
            count: 0,
        };
        let depth = self.claim(slot, "sequential")?;
        Ok(SequentialEncoder {
            encoder: self,
            depth,
        })
    }

    /// Write the current level as one value.
    pub fn single_value(&mut self) -> Result<SingleValueEncoder<'_, S>, MappingError> {
        let depth = self.claim(Slot::Single(None), "single value")?;
        Ok(SingleValueEncoder {
            encoder: self,
            depth,
        })
    }

    /// The finished tree. Fails if nothing was written.
    pub fn into_value(mut self) -> Result<S, MappingError> {
        match self.slots.pop().and_then(Slot::into_value) {
            Some(value) => Ok(value),
            None => Err(self.error(MappingErrorKind::DataCorrupted {
                reason: "nothing was encoded".to_owned(),
            })),
        }
    }

    fn into_value_or_empty(mut self) -> S {
        self.slots
            .pop()
            .and_then(Slot::into_value)
            .unwrap_or_else(S::object)
    }

    fn claim(&mut self, slot: Slot<S>, shape: &'static str) -> Result<usize, MappingError> {
        let depth = self.slots.len() - 1;
        if !matches!(self.slots[depth], Slot::Empty) {
            return Err(self.error(MappingErrorKind::DataCorrupted {
                reason: format!("a container was already requested here, cannot open a {shape} one"),
            }));
        }
        self.slots[depth] = slot;
        trace!(path = %Path::from(self.path.as_slice()), shape, "encode container");
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

    /// Run `body` on a fresh level and return what it built. A level left
    /// empty becomes an empty object.
    fn encode_child<R>(
        &mut self,
        key: Option<MappingKey>,
        body: impl FnOnce(&mut Self) -> Result<R, MappingError>,
    ) -> Result<(R, S), MappingError> {
        let keyed = key.is_some();
        if let Some(key) = key {
            self.path.push(key);
        }
        self.slots.push(Slot::Empty);
        trace!(path = %Path::from(self.path.as_slice()), "enter");

        let result = body(self).map_err(|err| {
            if err.path.is_empty() {
                err.at(self.path.as_slice())
            } else {
                err
            }
        });

        let slot = self.slots.pop();
        if keyed {
            self.path.pop();
        }
        let value = slot.and_then(Slot::into_value).unwrap_or_else(S::object);
        Ok((result?, value))
    }
}

/// Named-field writes into an object level.
pub struct KeyedEncoder<'e, S: StructuredValue> {
    encoder: &'e mut Encoder<S>,
    depth: usize,
}

impl<S: StructuredValue> KeyedEncoder<'_, S> {
    /// The keys leading to this object.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.encoder.coding_path()
    }

    /// Encode `value` under `key`.
    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), MappingError> {
        let wire = self.encoder.options.naming.apply(key).into_owned();
        self.encode_wire(wire, value)
    }

    pub(crate) fn encode_wire<T: Encode + ?Sized>(
        &mut self,
        wire: String,
        value: &T,
    ) -> Result<(), MappingError> {
        let key = MappingKey::from(wire.as_str());
        let ((), node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| value.encode(encoder))?;
        self.insert(key, wire, node)
    }

    /// Encode `value` under `key`; `None` writes nothing.
    pub fn encode_optional<T: Encode>(
        &mut self,
        key: &str,
        value: &Option<T>,
    ) -> Result<(), MappingError> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// Write null under `key`.
    pub fn encode_nil(&mut self, key: &str) -> Result<(), MappingError> {
        let wire = self.encoder.options.naming.apply(key).into_owned();
        self.insert(MappingKey::from(wire.as_str()), wire, S::null())
    }

    /// Write an object under `key`.
    pub fn nested_keyed<R>(
        &mut self,
        key: &str,
        body: impl FnOnce(&mut KeyedEncoder<'_, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let wire = self.encoder.options.naming.apply(key).into_owned();
        let key = MappingKey::from(wire.as_str());
        let (result, node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| body(&mut encoder.keyed()?))?;
        self.insert(key, wire, node)?;
        Ok(result)
    }

    /// Write an array under `key`.
    pub fn nested_sequential<R>(
        &mut self,
        key: &str,
        body: impl FnOnce(&mut SequentialEncoder<'_, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let wire = self.encoder.options.naming.apply(key).into_owned();
        let key = MappingKey::from(wire.as_str());
        let (result, node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| body(&mut encoder.sequential()?))?;
        self.insert(key, wire, node)?;
        Ok(result)
    }

    /// A child encoder reserved for the key `"super"`.
    pub fn delegate(&self) -> DelegatedEncoder<S> {
        self.delegate_for("super")
    }

    /// A child encoder reserved for `key`. Its value lands in this object
    /// once handed to [`finish_delegate`](Self::finish_delegate).
    pub fn delegate_for(&self, key: &str) -> DelegatedEncoder<S> {
        let wire = self.encoder.options.naming.apply(key).into_owned();
        let mut path = self.encoder.path.clone();
        path.push(MappingKey::from(wire.as_str()));
        DelegatedEncoder {
            wire,
            encoder: Encoder::at_path(path, self.encoder.options),
        }
    }

    /// Write a delegated encoder's value under its reserved key. A delegate
    /// that wrote nothing leaves an empty object.
    pub fn finish_delegate(&mut self, delegated: DelegatedEncoder<S>) -> Result<(), MappingError> {
        let DelegatedEncoder { wire, encoder } = delegated;
        let value = encoder.into_value_or_empty();
        self.insert(MappingKey::from(wire.as_str()), wire, value)
    }

    fn insert(&mut self, key: MappingKey, wire: String, value: S) -> Result<(), MappingError> {
        let result = match &mut self.encoder.slots[self.depth] {
            Slot::Keyed(object) => object.insert_field(wire, value),
            _ => Err(closed("keyed")),
        };
        result.map_err(|kind| self.encoder.error_at(key, kind))
    }
}

/// Appends to an array level.
pub struct SequentialEncoder<'e, S: StructuredValue> {
    encoder: &'e mut Encoder<S>,
    depth: usize,
}

impl<S: StructuredValue> SequentialEncoder<'_, S> {
    /// The keys leading to this array.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.encoder.coding_path()
    }

    /// Number of elements written so far.
    pub fn count(&self) -> usize {
        match &self.encoder.slots[self.depth] {
            Slot::Sequential { count, .. } => *count,
            _ => 0,
        }
    }

    /// Append `value`.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), MappingError> {
        let key = MappingKey::Index(self.count());
        let ((), node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| value.encode(encoder))?;
        self.push(key, node)
    }

    /// Append null.
    pub fn encode_nil(&mut self) -> Result<(), MappingError> {
        self.push(MappingKey::Index(self.count()), S::null())
    }

    /// Append an object.
    pub fn nested_keyed<R>(
        &mut self,
        body: impl FnOnce(&mut KeyedEncoder<'_, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let key = MappingKey::Index(self.count());
        let (result, node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| body(&mut encoder.keyed()?))?;
        self.push(key, node)?;
        Ok(result)
    }

    /// Append an array.
    pub fn nested_sequential<R>(
        &mut self,
        body: impl FnOnce(&mut SequentialEncoder<'_, S>) -> Result<R, MappingError>,
    ) -> Result<R, MappingError> {
        let key = MappingKey::Index(self.count());
        let (result, node) = self
            .encoder
            .encode_child(Some(key.clone()), |encoder| body(&mut encoder.sequential()?))?;
        self.push(key, node)?;
        Ok(result)
    }

    fn push(&mut self, key: MappingKey, value: S) -> Result<(), MappingError> {
        let result = match &mut self.encoder.slots[self.depth] {
            Slot::Sequential { array, count } => array.push_item(value).map(|()| *count += 1),
            _ => Err(closed("sequential")),
        };
        result.map_err(|kind| self.encoder.error_at(key, kind))
    }
}

/// Writes the one value of a level.
pub struct SingleValueEncoder<'e, S: StructuredValue> {
    encoder: &'e mut Encoder<S>,
    depth: usize,
}

impl<S: StructuredValue> SingleValueEncoder<'_, S> {
    /// The keys leading to this value.
    pub fn coding_path(&self) -> &[MappingKey] {
        self.encoder.coding_path()
    }

    /// Write null.
    pub fn encode_nil(&mut self) -> Result<(), MappingError> {
        self.store(S::null())
    }

    /// Write a primitive, subject to the exactness rules.
    pub fn encode_primitive<P: Primitive>(&mut self, value: &P) -> Result<(), MappingError> {
        let node = encode_scalar::<P, S>(value).map_err(|kind| {
            trace!(path = %Path::from(self.encoder.path.as_slice()), error = %kind, "coercion failed");
            self.encoder.error(kind)
        })?;
        self.store(node)
    }

    /// Write `value`, which gets a fresh level of its own.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), MappingError> {
        let ((), node) = self.encoder.encode_child(None, |encoder| value.encode(encoder))?;
        self.store(node)
    }

    pub(crate) fn encode_node(&mut self, node: S) -> Result<(), MappingError> {
        self.store(node)
    }

    fn store(&mut self, node: S) -> Result<(), MappingError> {
        let result = match &mut self.encoder.slots[self.depth] {
            Slot::Single(slot @ None) => {
                *slot = Some(node);
                Ok(())
            }
            Slot::Single(Some(_)) => Err(MappingErrorKind::DataCorrupted {
                reason: "a single value container holds one value".to_owned(),
            }),
            _ => Err(closed("single value")),
        };
        result.map_err(|kind| self.encoder.error(kind))
    }
}

/// A standalone encoder bound to a reserved key of a keyed container.
///
/// Dereferences to an [`Encoder`] positioned under that key. Nothing reaches
/// the parent until it is passed to [`KeyedEncoder::finish_delegate`].
pub struct DelegatedEncoder<S: StructuredValue> {
    wire: String,
    encoder: Encoder<S>,
}

impl<S: StructuredValue> DelegatedEncoder<S> {
    /// The wire key the value will be written under.
    pub fn key(&self) -> &str {
        &self.wire
    }
}

impl<S: StructuredValue> Deref for DelegatedEncoder<S> {
    type Target = Encoder<S>;

    fn deref(&self) -> &Self::Target {
        &self.encoder
    }
}

impl<S: StructuredValue> DerefMut for DelegatedEncoder<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.encoder
    }
}
