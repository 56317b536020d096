//! The engine's own tree.

use core::fmt;

use indexmap::IndexMap;

use crate::{MappingError, MappingKey, navigate};

/// Field storage of an object node. Iteration follows insertion order;
/// equality ignores it.
pub type Object = IndexMap<String, Value>;

/// A node of a structured tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Explicit absence.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Double(f64),
    /// A string.
    String(String),
    /// An ordered list.
    Array(Vec<Value>),
    /// Named fields with unique keys.
    Object(Object),
}

/// The variant of a [`Value`], used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Double`]
    Double,
    /// [`Value::String`]
    String,
    /// [`Value::Array`]
    Array,
    /// [`Value::Object`]
    Object,
}

impl ValueKind {
    /// Lowercase name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The variant of this node.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Whether this node is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The fields, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The node at `path`, or `None` if a step is missing.
    ///
    /// A name applied to a non-object, or an index applied to a non-array,
    /// is a type mismatch rather than absence.
    pub fn get(&self, path: &[MappingKey]) -> Result<Option<&Value>, MappingError> {
        let mut current = self;
        for (depth, key) in path.iter().enumerate() {
            let next = match (key, current) {
                (MappingKey::Name(name), Value::Object(fields)) => fields.get(name.as_ref()),
                (MappingKey::Index(index), Value::Array(items)) => items.get(*index),
                (key, other) => {
                    return Err(MappingError::new(navigate::step_mismatch(key, other.kind()))
                        .at(&path[..=depth]));
                }
            };
            match next {
                Some(node) => current = node,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// This tree with `value` stored at `path`; see [`set`](crate::set).
    pub fn set(self, path: &[MappingKey], value: Value, merge: bool) -> Result<Value, MappingError> {
        navigate::set(self, path, value, merge)
    }

    /// This tree without the field at `path`; see [`remove`](crate::remove).
    pub fn remove(self, path: &[MappingKey]) -> Result<Value, MappingError> {
        navigate::remove(self, path)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name:?}: {field}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(fields: Object) -> Self {
        Value::Object(fields)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn object_equality_ignores_order() {
        let a = value!({ "a": 1, "b": 2 });
        let b = value!({ "b": 2, "a": 1 });
        assert_eq!(a, b);
        assert_ne!(value!([1, 2]), value!([2, 1]));
    }

    #[test]
    fn display_is_json_like() {
        let tree = value!({ "name": "Rio", "ints": [2, 5], "ok": true, "nothing": null, "pi": 3.5 });
        insta::assert_snapshot!(
            tree,
            @r#"{"name": "Rio", "ints": [2, 5], "ok": true, "nothing": null, "pi": 3.5}"#
        );
    }

    #[test]
    fn get_distinguishes_absence_from_mismatch() {
        let tree = value!({ "ints": [1, 2] });
        let ints = MappingKey::from("ints");
        assert_eq!(tree.get(&[ints.clone(), MappingKey::Index(5)]), Ok(None));
        assert_eq!(tree.get(&[MappingKey::from("other")]), Ok(None));

        let err = tree.get(&[ints, MappingKey::from("first")]).unwrap_err();
        insta::assert_snapshot!(err, @"at .ints.first: type mismatch: expected object, got array");
    }
}
