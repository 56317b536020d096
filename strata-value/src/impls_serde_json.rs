#![cfg(feature = "serde_json")]

//! `serde_json::Value` as a tree backend.

use std::borrow::Cow;

use serde_json::{Map, Number, Value as Json};

use crate::structured::{expected_array, expected_object};
use crate::{MappingErrorKind, ScalarKind, StructuredValue, Value, ValueKind};

impl StructuredValue for Json {
    fn null() -> Self {
        Json::Null
    }

    fn bool(value: bool) -> Self {
        Json::Bool(value)
    }

    fn int(value: i64) -> Self {
        Json::Number(Number::from(value))
    }

    fn double(value: f64) -> Result<Self, MappingErrorKind> {
        Number::from_f64(value)
            .map(Json::Number)
            .ok_or_else(|| MappingErrorKind::DataCorrupted {
                reason: format!("{value} cannot be stored as a JSON number"),
            })
    }

    fn string(value: String) -> Self {
        Json::String(value)
    }

    fn array(items: Vec<Self>) -> Self {
        Json::Array(items)
    }

    fn object() -> Self {
        Json::Object(Map::new())
    }

    fn kind(&self) -> ValueKind {
        match self {
            Json::Null => ValueKind::Null,
            Json::Bool(_) => ValueKind::Bool,
            Json::Number(n) if n.is_f64() => ValueKind::Double,
            Json::Number(_) => ValueKind::Int,
            Json::String(_) => ValueKind::String,
            Json::Array(_) => ValueKind::Array,
            Json::Object(_) => ValueKind::Object,
        }
    }

    fn scalar(&self, hint: ScalarKind) -> Result<Value, MappingErrorKind> {
        match self {
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Value::Int(i)),
                (None, Some(d)) if n.is_f64() => Ok(Value::Double(d)),
                // a u64 past i64::MAX
                _ => Err(MappingErrorKind::NumberOutOfRange {
                    value: n.to_string(),
                    target: "int",
                }),
            },
            other => Err(MappingErrorKind::TypeMismatch {
                expected: hint.as_str(),
                got: other.kind(),
            }),
        }
    }

    fn field(&self, name: &str) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        match self {
            Json::Object(map) => Ok(map.get(name).map(Cow::Borrowed)),
            other => Err(expected_object(other.kind())),
        }
    }

    fn item(&self, index: usize) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        match self {
            Json::Array(items) => Ok(items.get(index).map(Cow::Borrowed)),
            other => Err(expected_array(other.kind())),
        }
    }

    fn items(&self) -> Option<Cow<'_, [Self]>> {
        match self {
            Json::Array(items) => Some(Cow::Borrowed(items.as_slice())),
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        match self {
            Json::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, MappingErrorKind> {
        match self {
            Json::Object(map) => Ok(map.get_mut(name)),
            other => Err(expected_object(other.kind())),
        }
    }

    fn insert_field(&mut self, name: String, value: Self) -> Result<(), MappingErrorKind> {
        match self {
            Json::Object(map) => {
                map.insert(name, value);
                Ok(())
            }
            other => Err(expected_object(other.kind())),
        }
    }

    fn remove_field(&mut self, name: &str) -> Result<Option<Self>, MappingErrorKind> {
        match self {
            Json::Object(map) => Ok(map.shift_remove(name)),
            other => Err(expected_object(other.kind())),
        }
    }

    fn item_mut(&mut self, index: usize) -> Result<Option<&mut Self>, MappingErrorKind> {
        match self {
            Json::Array(items) => Ok(items.get_mut(index)),
            other => Err(expected_array(other.kind())),
        }
    }

    fn push_item(&mut self, value: Self) -> Result<(), MappingErrorKind> {
        match self {
            Json::Array(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(expected_array(other.kind())),
        }
    }
}
