//! Reading typed values out of a tree.

use std::borrow::Cow;

use core::marker::PhantomData;
use core::ops::Deref;

use strata_value::{
    KeySpace, MappingError, MappingErrorKind, MappingKey, RawRepresentable, StructuredValue,
    Value, get,
};

use crate::element::{decode_items, decode_raw};
use crate::tracing_macros::{trace, trace_span};
use crate::{MapDecode, MapDecodeInContext};

/// A type that can be read from a tree through a [`Mapper`].
pub trait InputMappable: Sized {
    /// The keys this type reads.
    type Key: KeySpace;

    /// Read a value, mapping each field by key.
    fn from_mapper<S: StructuredValue>(mapper: &Mapper<'_, Self::Key, S>) -> Result<Self, MappingError>;

    /// Read a value from the root of `source`.
    fn from_tree<S: StructuredValue>(source: &S) -> Result<Self, MappingError> {
        trace_span!("from_tree", ty = core::any::type_name::<Self>());
        Self::from_mapper(&Mapper::new(source))
    }
}

/// A type that is read from a tree according to a caller-chosen context.
pub trait ContextInputMappable: Sized {
    /// The keys this type reads.
    type Key: KeySpace;
    /// The context handed down from the caller.
    type Context;

    /// Read a value, mapping each field by key.
    fn from_contextual_mapper<S: StructuredValue>(
        mapper: &ContextualMapper<'_, Self::Key, Self::Context, S>,
    ) -> Result<Self, MappingError>;

    /// Read a value from the root of `source` under `context`.
    fn from_tree_with<S: StructuredValue>(
        source: &S,
        context: &Self::Context,
    ) -> Result<Self, MappingError> {
        trace_span!("from_tree_with", ty = core::any::type_name::<Self>());
        Self::from_contextual_mapper(&ContextualMapper::new(source, context))
    }
}

/// A read-only view of a tree, addressed through the key space `K`.
///
/// Every `map*` call takes a key path relative to the mapper's root; an empty
/// path maps the root itself. Null is read as absent.
pub struct Mapper<'a, K, S: StructuredValue = Value> {
    source: Cow<'a, S>,
    keys: PhantomData<fn(&K)>,
}

impl<'a, K: KeySpace, S: StructuredValue> Mapper<'a, K, S> {
    /// A mapper over `source`.
    pub fn new(source: &'a S) -> Self {
        Self {
            source: Cow::Borrowed(source),
            keys: PhantomData,
        }
    }

    /// The tree this mapper reads.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn resolve(&self, keys: &[K]) -> Result<(Vec<MappingKey>, Option<Cow<'_, S>>), MappingError> {
        let path: Vec<MappingKey> = keys.iter().map(KeySpace::mapping_key).collect();
        let node = get(&*self.source, &path)?;
        Ok((path, node))
    }

    fn required<'s>(
        &'s self,
        keys: &[K],
        is_absent: impl Fn(&S) -> bool,
    ) -> Result<(Vec<MappingKey>, Cow<'s, S>), MappingError> {
        let (path, node) = self.resolve(keys)?;
        match node {
            Some(node) if !is_absent(&*node) => Ok((path, node)),
            _ => {
                trace!(path = ?path, "required value not found");
                Err(MappingError::new(MappingErrorKind::ValueNotFound).at(path))
            }
        }
    }

    fn optional<'s>(
        &'s self,
        keys: &[K],
        is_absent: impl Fn(&S) -> bool,
    ) -> Result<(Vec<MappingKey>, Option<Cow<'s, S>>), MappingError> {
        let (path, node) = self.resolve(keys)?;
        Ok((path, node.filter(|node| !is_absent(&**node))))
    }

    /// Read the value at `keys`, failing with
    /// [`ValueNotFound`](MappingErrorKind::ValueNotFound) if it is absent.
    pub fn map<T: MapDecode>(&self, keys: &[K]) -> Result<T, MappingError> {
        let (path, node) = self.required(keys, T::is_absent)?;
        T::map_decode(&*node).map_err(|err| err.with_prefix(&path))
    }

    /// Read the value at `keys`, or `None` if it is absent.
    pub fn map_optional<T: MapDecode>(&self, keys: &[K]) -> Result<Option<T>, MappingError> {
        let (path, node) = self.optional(keys, T::is_absent)?;
        node.map(|node| T::map_decode(&*node).map_err(|err| err.with_prefix(&path)))
            .transpose()
    }

    /// Read a raw-value enumeration at `keys`.
    pub fn map_raw<T: RawRepresentable>(&self, keys: &[K]) -> Result<T, MappingError> {
        let (path, node) = self.required(keys, S::is_null)?;
        decode_raw(&*node).map_err(|err| err.with_prefix(&path))
    }

    /// Read a raw-value enumeration at `keys`, or `None` if it is absent.
    pub fn map_raw_optional<T: RawRepresentable>(&self, keys: &[K]) -> Result<Option<T>, MappingError> {
        let (path, node) = self.optional(keys, S::is_null)?;
        node.map(|node| decode_raw(&*node).map_err(|err| err.with_prefix(&path)))
            .transpose()
    }

    /// Read an array of raw-value enumerations at `keys`.
    pub fn map_raw_array<T: RawRepresentable>(&self, keys: &[K]) -> Result<Vec<T>, MappingError> {
        let (path, node) = self.required(keys, |node| node.is_null() && node.items().is_none())?;
        decode_items(&*node, S::is_null, decode_raw).map_err(|err| err.with_prefix(&path))
    }

    /// Read a contextual value at `keys` under an explicit `context`.
    pub fn map_with_context<T, C>(&self, keys: &[K], context: &C) -> Result<T, MappingError>
    where
        T: MapDecodeInContext<C>,
    {
        let (path, node) = self.required(keys, T::is_absent)?;
        T::map_decode_in_context(&*node, context).map_err(|err| err.with_prefix(&path))
    }

    /// Read a contextual value at `keys` under `context`, or `None` if it is
    /// absent.
    pub fn map_optional_with_context<T, C>(
        &self,
        keys: &[K],
        context: &C,
    ) -> Result<Option<T>, MappingError>
    where
        T: MapDecodeInContext<C>,
    {
        let (path, node) = self.optional(keys, T::is_absent)?;
        node.map(|node| {
            T::map_decode_in_context(&*node, context).map_err(|err| err.with_prefix(&path))
        })
        .transpose()
    }
}

/// A [`Mapper`] that also carries a context for nested contextual reads.
pub struct ContextualMapper<'a, K, C, S: StructuredValue = Value> {
    mapper: Mapper<'a, K, S>,
    context: &'a C,
}

impl<'a, K: KeySpace, C, S: StructuredValue> ContextualMapper<'a, K, C, S> {
    /// A contextual mapper over `source`.
    pub fn new(source: &'a S, context: &'a C) -> Self {
        Self {
            mapper: Mapper::new(source),
            context,
        }
    }

    /// The context this mapper was created with.
    pub fn context(&self) -> &'a C {
        self.context
    }

    /// Read a contextual value at `keys` under this mapper's own context.
    pub fn map_in_context<T: MapDecodeInContext<C>>(&self, keys: &[K]) -> Result<T, MappingError> {
        self.mapper.map_with_context(keys, self.context)
    }

    /// Read a contextual value at `keys` under this mapper's own context, or
    /// `None` if it is absent.
    pub fn map_optional_in_context<T: MapDecodeInContext<C>>(
        &self,
        keys: &[K],
    ) -> Result<Option<T>, MappingError> {
        self.mapper.map_optional_with_context(keys, self.context)
    }
}

impl<'a, K, C, S: StructuredValue> Deref for ContextualMapper<'a, K, C, S> {
    type Target = Mapper<'a, K, S>;

    fn deref(&self) -> &Self::Target {
        &self.mapper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_value::value;

    #[test]
    fn null_reads_as_absent() {
        let tree = value!({ "int": null, "ints": null });
        let mapper: Mapper<'_, &str> = Mapper::new(&tree);
        assert_eq!(mapper.map_optional::<i64>(&["int"]), Ok(None));
        assert_eq!(mapper.map_optional::<Vec<i64>>(&["ints"]), Ok(None));

        let err = mapper.map::<i64>(&["int"]).unwrap_err();
        insta::assert_snapshot!(err, @"at .int: value not found");
    }

    #[test]
    fn empty_path_maps_the_root() {
        let tree = value!([15, 21]);
        let mapper: Mapper<'_, &str> = Mapper::new(&tree);
        assert_eq!(mapper.map::<Vec<u8>>(&[]), Ok(vec![15, 21]));
    }

    #[test]
    fn array_elements_carry_their_index() {
        let tree = value!({ "ints": [1, "two", 3] });
        let mapper: Mapper<'_, &str> = Mapper::new(&tree);
        let err = mapper.map::<Vec<i64>>(&["ints"]).unwrap_err();
        insta::assert_snapshot!(err, @"at .ints[1]: type mismatch: expected i64, got string");

        let tree = value!({ "ints": [1, null] });
        let mapper: Mapper<'_, &str> = Mapper::new(&tree);
        assert_eq!(
            mapper.map::<Vec<Option<i64>>>(&["ints"]),
            Ok(vec![Some(1), None])
        );
        let err = mapper.map::<Vec<i64>>(&["ints"]).unwrap_err();
        insta::assert_snapshot!(err, @"at .ints[1]: value not found");
    }
}
