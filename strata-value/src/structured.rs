//! The contract a tree backend fulfils.

use std::borrow::Cow;

use core::fmt;

use crate::{MappingErrorKind, ScalarKind, Value, ValueKind};

/// A tree that can be read and written by path.
///
/// Backends need not store the seven kinds physically: they only have to
/// build them and answer object, array and scalar views of each node. Views a
/// node cannot offer fail with [`MappingErrorKind::TypeMismatch`]; a missing
/// field or index is `Ok(None)`.
pub trait StructuredValue: Clone + fmt::Debug + Sized {
    /// An explicit null.
    fn null() -> Self;

    /// A boolean leaf.
    fn bool(value: bool) -> Self;

    /// An integer leaf.
    fn int(value: i64) -> Self;

    /// A float leaf. Fails for numbers the backend cannot hold.
    fn double(value: f64) -> Result<Self, MappingErrorKind>;

    /// A string leaf.
    fn string(value: String) -> Self;

    /// An array of the given items.
    fn array(items: Vec<Self>) -> Self;

    /// An empty object.
    fn object() -> Self;

    /// The kind this node presents.
    fn kind(&self) -> ValueKind;

    /// Whether this node is null.
    fn is_null(&self) -> bool {
        self.kind() == ValueKind::Null
    }

    /// The scalar stored at this node. `hint` names the kind the reader wants,
    /// which lets text-based backends parse the leaf accordingly.
    fn scalar(&self, hint: ScalarKind) -> Result<Value, MappingErrorKind>;

    /// The field `name` of an object node.
    fn field(&self, name: &str) -> Result<Option<Cow<'_, Self>>, MappingErrorKind>;

    /// The item at `index` of an array node.
    fn item(&self, index: usize) -> Result<Option<Cow<'_, Self>>, MappingErrorKind>;

    /// All items, or `None` if this node has no array view.
    fn items(&self) -> Option<Cow<'_, [Self]>>;

    /// Names of all fields, or an empty list if this node has no object view.
    fn field_names(&self) -> Vec<String>;

    /// Mutable access to the field `name` of an object node.
    fn field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, MappingErrorKind>;

    /// Insert or replace the field `name` of an object node.
    fn insert_field(&mut self, name: String, value: Self) -> Result<(), MappingErrorKind>;

    /// Remove the field `name` of an object node, returning it if present.
    fn remove_field(&mut self, name: &str) -> Result<Option<Self>, MappingErrorKind>;

    /// Mutable access to the item at `index` of an array node.
    fn item_mut(&mut self, index: usize) -> Result<Option<&mut Self>, MappingErrorKind>;

    /// Append an item to an array node.
    fn push_item(&mut self, value: Self) -> Result<(), MappingErrorKind>;

    /// Replace this node in place with `value`.
    fn assign(&mut self, value: Self) {
        *self = value;
    }

    /// Move every field of `other` into this object, overriding on conflict.
    fn merge_object(&mut self, mut other: Self) -> Result<(), MappingErrorKind> {
        for name in other.field_names() {
            if let Some(field) = other.remove_field(&name)? {
                self.insert_field(name, field)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn expected_object(got: ValueKind) -> MappingErrorKind {
    MappingErrorKind::TypeMismatch {
        expected: "object",
        got,
    }
}

pub(crate) fn expected_array(got: ValueKind) -> MappingErrorKind {
    MappingErrorKind::TypeMismatch {
        expected: "array",
        got,
    }
}

impl StructuredValue for Value {
    fn null() -> Self {
        Value::Null
    }

    fn bool(value: bool) -> Self {
        Value::Bool(value)
    }

    fn int(value: i64) -> Self {
        Value::Int(value)
    }

    fn double(value: f64) -> Result<Self, MappingErrorKind> {
        Ok(Value::Double(value))
    }

    fn string(value: String) -> Self {
        Value::String(value)
    }

    fn array(items: Vec<Self>) -> Self {
        Value::Array(items)
    }

    fn object() -> Self {
        Value::Object(Default::default())
    }

    fn kind(&self) -> ValueKind {
        Value::kind(self)
    }

    fn scalar(&self, hint: ScalarKind) -> Result<Value, MappingErrorKind> {
        match self {
            Value::Null | Value::Array(_) | Value::Object(_) => {
                Err(MappingErrorKind::TypeMismatch {
                    expected: hint.as_str(),
                    got: Value::kind(self),
                })
            }
            scalar => Ok(scalar.clone()),
        }
    }

    fn field(&self, name: &str) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        match self {
            Value::Object(fields) => Ok(fields.get(name).map(Cow::Borrowed)),
            other => Err(expected_object(Value::kind(other))),
        }
    }

    fn item(&self, index: usize) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        match self {
            Value::Array(items) => Ok(items.get(index).map(Cow::Borrowed)),
            other => Err(expected_array(Value::kind(other))),
        }
    }

    fn items(&self) -> Option<Cow<'_, [Self]>> {
        match self {
            Value::Array(items) => Some(Cow::Borrowed(items.as_slice())),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        match self {
            Value::Object(fields) => fields.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, MappingErrorKind> {
        match self {
            Value::Object(fields) => Ok(fields.get_mut(name)),
            other => Err(expected_object(Value::kind(other))),
        }
    }

    fn insert_field(&mut self, name: String, value: Self) -> Result<(), MappingErrorKind> {
        match self {
            Value::Object(fields) => {
                fields.insert(name, value);
                Ok(())
            }
            other => Err(expected_object(Value::kind(other))),
        }
    }

    fn remove_field(&mut self, name: &str) -> Result<Option<Self>, MappingErrorKind> {
        match self {
            Value::Object(fields) => Ok(fields.shift_remove(name)),
            other => Err(expected_object(Value::kind(other))),
        }
    }

    fn item_mut(&mut self, index: usize) -> Result<Option<&mut Self>, MappingErrorKind> {
        match self {
            Value::Array(items) => Ok(items.get_mut(index)),
            other => Err(expected_array(Value::kind(other))),
        }
    }

    fn push_item(&mut self, value: Self) -> Result<(), MappingErrorKind> {
        match self {
            Value::Array(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(expected_array(Value::kind(other))),
        }
    }
}
