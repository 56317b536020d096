//! Path algorithms written once over [`StructuredValue`].

use std::borrow::Cow;

use crate::tracing_macros::trace;
use crate::{MappingError, MappingErrorKind, MappingKey, StructuredValue, ValueKind};

pub(crate) fn step_mismatch(key: &MappingKey, got: ValueKind) -> MappingErrorKind {
    MappingErrorKind::TypeMismatch {
        expected: if key.is_index() { "array" } else { "object" },
        got,
    }
}

/// One navigation step: names address objects, indices address arrays.
pub fn child<'v, S: StructuredValue>(
    node: &'v S,
    key: &MappingKey,
) -> Result<Option<Cow<'v, S>>, MappingErrorKind> {
    match key {
        MappingKey::Name(name) => node.field(name),
        MappingKey::Index(index) => node.item(*index),
    }
}

/// The node at `path`, or `None` if a step is missing.
///
/// A name applied to a non-object, or an index applied to a non-array, fails
/// with a type mismatch whose path ends at the offending key.
pub fn get<'v, S: StructuredValue>(
    tree: &'v S,
    path: &[MappingKey],
) -> Result<Option<Cow<'v, S>>, MappingError> {
    let mut current = Cow::Borrowed(tree);
    for (depth, key) in path.iter().enumerate() {
        let next = match current {
            Cow::Borrowed(node) => child(node, key),
            Cow::Owned(node) => {
                child(&node, key).map(|found| found.map(|c| Cow::Owned(c.into_owned())))
            }
        };
        match next.map_err(|kind| MappingError::new(kind).at(&path[..=depth]))? {
            Some(node) => current = node,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// `tree` with `value` stored at `path`.
///
/// Missing intermediate containers are created: an array when the next key is
/// an index, an object otherwise. Arrays never grow; writing past the end
/// fails with [`MappingErrorKind::OutOfBounds`]. With `merge`, an object
/// written over an existing object adds its fields to it instead of replacing
/// it. Merging applies at the target node only.
pub fn set<S: StructuredValue>(
    mut tree: S,
    path: &[MappingKey],
    value: S,
    merge: bool,
) -> Result<S, MappingError> {
    set_at(&mut tree, path, value, merge)?;
    Ok(tree)
}

/// In-place form of [`set`]. On failure the tree may hold a partial write.
pub fn set_at<S: StructuredValue>(
    node: &mut S,
    path: &[MappingKey],
    value: S,
    merge: bool,
) -> Result<(), MappingError> {
    let Some((first, rest)) = path.split_first() else {
        if merge && node.kind() == ValueKind::Object && value.kind() == ValueKind::Object {
            node.merge_object(value)?;
        } else {
            node.assign(value);
        }
        return Ok(());
    };

    let result = match first {
        MappingKey::Index(index) => match node.item_mut(*index) {
            Ok(Some(item)) => set_at(item, rest, value, merge),
            Ok(None) => {
                let len = node.items().map_or(0, |items| items.len());
                Err(MappingError::new(MappingErrorKind::OutOfBounds { index: *index, len }))
            }
            Err(kind) => Err(MappingError::new(kind)),
        },
        MappingKey::Name(name) => match node.field_mut(name) {
            Ok(Some(field)) => set_at(field, rest, value, merge),
            Ok(None) => fresh_branch(rest, value, merge).and_then(|branch| {
                node.insert_field(name.to_string(), branch)
                    .map_err(MappingError::new)
            }),
            Err(kind) => Err(MappingError::new(kind)),
        },
    };

    result.map_err(|err| {
        trace!(key = %first, error = %err, "set failed");
        err.with_path(first.clone())
    })
}

/// A new subtree holding `value` at `rest`, shaped after the keys in `rest`.
fn fresh_branch<S: StructuredValue>(
    rest: &[MappingKey],
    value: S,
    merge: bool,
) -> Result<S, MappingError> {
    let Some(next) = rest.first() else {
        return Ok(value);
    };
    let mut branch = if next.is_index() {
        S::array(Vec::new())
    } else {
        S::object()
    };
    set_at(&mut branch, rest, value, merge)?;
    Ok(branch)
}

/// `tree` without the field at `path`.
///
/// The last key must name a field of an object; a field that is already
/// missing is not an error. Every step before it must be an existing field of
/// an object. An empty path
/// removes everything and leaves null.
pub fn remove<S: StructuredValue>(mut tree: S, path: &[MappingKey]) -> Result<S, MappingError> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(S::null());
    };

    let mut node = &mut tree;
    for (depth, key) in parents.iter().enumerate() {
        let at = &path[..=depth];
        let (MappingKey::Name(name), ValueKind::Object) = (key, node.kind()) else {
            let kind = MappingErrorKind::TypeMismatch {
                expected: "object",
                got: node.kind(),
            };
            return Err(MappingError::new(kind).at(at));
        };
        node = match node.field_mut(name) {
            Ok(Some(next)) => next,
            Ok(None) => {
                return Err(MappingError::new(MappingErrorKind::KeyNotFound {
                    key: key.to_string(),
                })
                .at(at));
            }
            Err(kind) => return Err(MappingError::new(kind).at(at)),
        };
    }

    match last {
        MappingKey::Name(name) => {
            node.remove_field(name)
                .map_err(|kind| MappingError::new(kind).at(path))?;
        }
        MappingKey::Index(_) => {
            let kind = MappingErrorKind::TypeMismatch {
                expected: "object",
                got: node.kind(),
            };
            return Err(MappingError::new(kind).at(path));
        }
    }
    Ok(tree)
}
