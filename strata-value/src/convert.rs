//! Moving whole trees between backends.

use crate::{
    MappingError, MappingErrorKind, MappingKey, Object, ScalarKind, StructuredValue, Value,
    ValueKind,
};

/// Build a tree of backend `S` holding the same data as `value`.
pub fn from_value<S: StructuredValue>(value: Value) -> Result<S, MappingError> {
    Ok(match value {
        Value::Null => S::null(),
        Value::Bool(b) => S::bool(b),
        Value::Int(i) => S::int(i),
        Value::Double(d) => S::double(d)?,
        Value::String(s) => S::string(s),
        Value::Array(items) => {
            let items = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    from_value(item).map_err(|err| err.with_path(MappingKey::Index(index)))
                })
                .collect::<Result<Vec<S>, _>>()?;
            S::array(items)
        }
        Value::Object(fields) => {
            let mut object = S::object();
            for (name, field) in fields {
                let key = MappingKey::from(name.as_str());
                let node = from_value(field).map_err(|err| err.with_path(key.clone()))?;
                object
                    .insert_field(name, node)
                    .map_err(|kind| MappingError::new(kind).at([key]))?;
            }
            object
        }
    })
}

/// Read a node of any backend into a [`Value`].
pub fn to_value<S: StructuredValue>(node: &S) -> Result<Value, MappingError> {
    match node.kind() {
        ValueKind::Null => Ok(Value::Null),
        ValueKind::Bool => Ok(node.scalar(ScalarKind::Bool)?),
        ValueKind::Int => Ok(node.scalar(ScalarKind::Int)?),
        ValueKind::Double => Ok(node.scalar(ScalarKind::Double)?),
        ValueKind::String => Ok(node.scalar(ScalarKind::String)?),
        ValueKind::Array => {
            let items = node.items().ok_or(MappingErrorKind::TypeMismatch {
                expected: "array",
                got: ValueKind::Array,
            })?;
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    to_value(item).map_err(|err| err.with_path(MappingKey::Index(index)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        ValueKind::Object => {
            let mut fields = Object::new();
            for name in node.field_names() {
                let key = MappingKey::from(name.as_str());
                let field = node
                    .field(&name)
                    .map_err(|kind| MappingError::new(kind).at([key.clone()]))?;
                if let Some(field) = field {
                    let value = to_value(field.as_ref()).map_err(|err| err.with_path(key))?;
                    fields.insert(name, value);
                }
            }
            Ok(Value::Object(fields))
        }
    }
}
