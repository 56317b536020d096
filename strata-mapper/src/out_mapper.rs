//! Writing typed values into a tree.

use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use strata_value::{
    KeySpace, MappingError, MappingErrorKind, MappingKey, RawRepresentable, StructuredValue,
    Value, set_at,
};

use crate::element::{encode_items, encode_raw};
use crate::tracing_macros::{trace, trace_span};
use crate::{MapEncode, MapEncodeInContext};

/// A type that can be written into a tree through an [`OutMapper`].
pub trait OutputMappable {
    /// The keys this type writes.
    type Key: KeySpace;

    /// Write every field by key.
    fn to_mapper<S: StructuredValue>(&self, mapper: &mut OutMapper<Self::Key, S>) -> Result<(), MappingError>;

    /// Write into a fresh object of backend `S`.
    fn to_tree<S: StructuredValue>(&self) -> Result<S, MappingError> {
        self.to_tree_onto(S::object())
    }

    /// Write on top of an existing tree.
    fn to_tree_onto<S: StructuredValue>(&self, destination: S) -> Result<S, MappingError> {
        trace_span!("to_tree", ty = core::any::type_name::<Self>());
        let mut mapper = OutMapper::of(destination);
        self.to_mapper(&mut mapper)?;
        Ok(mapper.into_destination())
    }

    /// Write into a fresh [`Value`].
    fn to_value(&self) -> Result<Value, MappingError> {
        self.to_tree()
    }
}

/// A type that is written according to a caller-chosen context.
pub trait ContextOutputMappable {
    /// The keys this type writes.
    type Key: KeySpace;
    /// The context handed down from the caller.
    type Context;

    /// Write every field by key.
    fn to_contextual_mapper<S: StructuredValue>(
        &self,
        mapper: &mut ContextualOutMapper<'_, Self::Key, Self::Context, S>,
    ) -> Result<(), MappingError>;

    /// Write into a fresh object of backend `S` under `context`.
    fn to_tree_with<S: StructuredValue>(&self, context: &Self::Context) -> Result<S, MappingError> {
        self.to_tree_onto_with(S::object(), context)
    }

    /// Write on top of an existing tree under `context`.
    fn to_tree_onto_with<S: StructuredValue>(
        &self,
        destination: S,
        context: &Self::Context,
    ) -> Result<S, MappingError> {
        trace_span!("to_tree_with", ty = core::any::type_name::<Self>());
        let mut mapper = ContextualOutMapper::of(destination, context);
        self.to_contextual_mapper(&mut mapper)?;
        Ok(mapper.into_destination())
    }
}

/// A writable view of a destination tree, addressed through the key space `K`.
///
/// Writes create missing containers along the path. Objects written over
/// objects are merged field by field; anything else replaces what was there.
pub struct OutMapper<K, S: StructuredValue = Value> {
    destination: S,
    keys: PhantomData<fn(&K)>,
}

impl<K: KeySpace, S: StructuredValue> OutMapper<K, S> {
    /// A mapper writing into an empty object.
    pub fn new() -> Self {
        Self::of(S::object())
    }

    /// A mapper writing on top of `destination`.
    pub fn of(destination: S) -> Self {
        Self {
            destination,
            keys: PhantomData,
        }
    }

    /// The tree written so far.
    pub fn destination(&self) -> &S {
        &self.destination
    }

    /// Finish writing and take the tree.
    pub fn into_destination(self) -> S {
        self.destination
    }

    fn write(
        &mut self,
        keys: &[K],
        encode: impl FnOnce() -> Result<S, MappingError>,
    ) -> Result<(), MappingError> {
        let path: Vec<MappingKey> = keys.iter().map(KeySpace::mapping_key).collect();
        let node = encode().map_err(|err| err.with_prefix(&path))?;
        set_at(&mut self.destination, &path, node, true).map_err(|err| {
            trace!(path = ?path, error = %err, "write into destination failed");
            let MappingError { kind, path } = err;
            MappingError::new(MappingErrorKind::CannotSet(Box::new(MappingError::new(kind)))).at(path)
        })
    }

    /// Write `value` at `keys`.
    pub fn map<T: MapEncode + ?Sized>(&mut self, value: &T, keys: &[K]) -> Result<(), MappingError> {
        self.write(keys, || value.map_encode())
    }

    /// Write `value` at `keys` if there is one; `None` writes nothing.
    pub fn map_optional<T: MapEncode>(&mut self, value: &Option<T>, keys: &[K]) -> Result<(), MappingError> {
        match value {
            Some(value) => self.map(value, keys),
            None => Ok(()),
        }
    }

    /// Write a raw-value enumeration at `keys`.
    pub fn map_raw<T: RawRepresentable>(&mut self, value: &T, keys: &[K]) -> Result<(), MappingError> {
        self.write(keys, || encode_raw(value))
    }

    /// Write an array of raw-value enumerations at `keys`.
    pub fn map_raw_array<T: RawRepresentable>(
        &mut self,
        values: &[T],
        keys: &[K],
    ) -> Result<(), MappingError> {
        self.write(keys, || encode_items(values, encode_raw))
    }

    /// Write a contextual value at `keys` under an explicit `context`.
    pub fn map_with_context<T, C>(&mut self, value: &T, keys: &[K], context: &C) -> Result<(), MappingError>
    where
        T: MapEncodeInContext<C> + ?Sized,
    {
        self.write(keys, || value.map_encode_in_context(context))
    }
}

impl<K: KeySpace, S: StructuredValue> Default for OutMapper<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// An [`OutMapper`] that also carries a context for nested contextual writes.
pub struct ContextualOutMapper<'c, K, C, S: StructuredValue = Value> {
    mapper: OutMapper<K, S>,
    context: &'c C,
}

impl<'c, K: KeySpace, C, S: StructuredValue> ContextualOutMapper<'c, K, C, S> {
    /// A contextual mapper writing into an empty object.
    pub fn new(context: &'c C) -> Self {
        Self::of(S::object(), context)
    }

    /// A contextual mapper writing on top of `destination`.
    pub fn of(destination: S, context: &'c C) -> Self {
        Self {
            mapper: OutMapper::of(destination),
            context,
        }
    }

    /// The context this mapper was created with.
    pub fn context(&self) -> &'c C {
        self.context
    }

    /// Finish writing and take the tree.
    pub fn into_destination(self) -> S {
        self.mapper.into_destination()
    }

    /// Write a contextual value at `keys` under this mapper's own context.
    pub fn map_in_context<T>(&mut self, value: &T, keys: &[K]) -> Result<(), MappingError>
    where
        T: MapEncodeInContext<C> + ?Sized,
    {
        let context = self.context;
        self.mapper.map_with_context(value, keys, context)
    }
}

impl<K, C, S: StructuredValue> Deref for ContextualOutMapper<'_, K, C, S> {
    type Target = OutMapper<K, S>;

    fn deref(&self) -> &Self::Target {
        &self.mapper
    }
}

impl<K, C, S: StructuredValue> DerefMut for ContextualOutMapper<'_, K, C, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_value::value;

    #[test]
    fn writes_create_paths_and_merge_objects() {
        let mut mapper: OutMapper<&str> = OutMapper::new();
        mapper.map(&1, &["nest", "a"]).unwrap();
        mapper.map(&value!({ "b": 2 }), &["nest"]).unwrap();
        mapper.map(&vec![1u8, 2], &["ints"]).unwrap();
        mapper.map_optional(&None::<i64>, &["skipped"]).unwrap();
        assert_eq!(
            mapper.into_destination(),
            value!({ "nest": { "a": 1, "b": 2 }, "ints": [1, 2] })
        );
    }

    #[test]
    fn empty_path_replaces_the_root() {
        let mut mapper: OutMapper<&str> = OutMapper::new();
        mapper.map(&5.0, &[]).unwrap();
        assert_eq!(mapper.into_destination(), Value::Double(5.0));
    }

    #[test]
    fn structural_failures_are_wrapped() {
        let mut mapper: OutMapper<&str> = OutMapper::of(value!({ "a": 1 }));
        let err = mapper.map("x", &["a", "b"]).unwrap_err();
        let MappingErrorKind::CannotSet(inner) = &err.kind else {
            panic!("expected CannotSet, got {err}");
        };
        assert!(inner.path.as_slice().is_empty());
        insta::assert_snapshot!(
            err,
            @"at .a.b: cannot set value: type mismatch: expected object, got int"
        );
    }

    #[test]
    fn unrepresentable_numbers_fail_before_writing() {
        let mut mapper: OutMapper<&str> = OutMapper::new();
        let err = mapper.map(&u64::MAX, &["big"]).unwrap_err();
        insta::assert_snapshot!(err, @"at .big: number 18446744073709551615 out of range for int");
        assert_eq!(mapper.destination(), &Value::object());
    }
}
