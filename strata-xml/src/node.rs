//! The element tree and its object, array and scalar views.

use std::borrow::Cow;

use indexmap::IndexMap;
use strata_value::{MappingErrorKind, ScalarKind, StructuredValue, Value, ValueKind};

/// Name given to the elements that hold array items.
pub const ITEM_ELEMENT: &str = "item";

/// A node of an XML tree.
#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    /// An element with its attributes, children and text.
    Element(XmlElement),
    /// Several nodes viewed as an array, such as repeated child elements.
    List(Vec<XmlNode>),
    /// A bare text leaf, such as an attribute value.
    Text(String),
}

/// One element.
///
/// Children are expected to be [`XmlNode::Element`]s; other nodes among them
/// are skipped by name lookups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlElement {
    /// Local name. Empty for an element that has not been placed in a tree.
    pub name: String,
    /// Attributes in document order.
    pub attributes: IndexMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Text content with surrounding whitespace trimmed.
    pub text: String,
}

impl XmlElement {
    /// An empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An element holding only text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Builder-style: add an attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style: add a child element.
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Element with children or attributes: object. Text only: string.
    /// Neither: null.
    pub fn kind(&self) -> ValueKind {
        if !self.children.is_empty() || !self.attributes.is_empty() {
            ValueKind::Object
        } else if !self.text.is_empty() {
            ValueKind::String
        } else {
            ValueKind::Null
        }
    }

    fn is_text_only(&self) -> bool {
        self.kind() == ValueKind::String
    }

    fn positions(&self, name: &str) -> Vec<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, child)| element_name(child) == Some(name))
            .map(|(index, _)| index)
            .collect()
    }
}

fn element_name(node: &XmlNode) -> Option<&str> {
    match node {
        XmlNode::Element(element) => Some(&element.name),
        _ => None,
    }
}

/// `value` as an element called `name`. Arrays become a wrapper element
/// with one [`ITEM_ELEMENT`] child per item.
pub(crate) fn into_element(name: String, value: XmlNode) -> XmlElement {
    match value {
        XmlNode::Element(mut element) => {
            element.name = name;
            element
        }
        XmlNode::Text(text) => XmlElement::with_text(name, text),
        XmlNode::List(items) => XmlElement {
            name,
            children: items
                .into_iter()
                .map(|item| XmlNode::Element(into_element(ITEM_ELEMENT.to_owned(), item)))
                .collect(),
            ..XmlElement::default()
        },
    }
}

fn parse_scalar(text: &str, hint: ScalarKind) -> Value {
    let trimmed = text.trim();
    let parsed = match hint {
        ScalarKind::Bool => match trimmed {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        ScalarKind::Int => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .or_else(|_| trimmed.parse::<f64>().map(Value::Double))
            .ok(),
        ScalarKind::Double => trimmed.parse::<f64>().map(Value::Double).ok(),
        ScalarKind::String => None,
    };
    // unparseable text stays a string, so the caller reports the mismatch
    parsed.unwrap_or_else(|| Value::String(text.to_owned()))
}

fn expected(shape: &'static str, got: ValueKind) -> MappingErrorKind {
    MappingErrorKind::TypeMismatch {
        expected: shape,
        got,
    }
}

impl StructuredValue for XmlNode {
    fn null() -> Self {
        XmlNode::Element(XmlElement::default())
    }

    fn bool(value: bool) -> Self {
        XmlNode::Text(value.to_string())
    }

    fn int(value: i64) -> Self {
        XmlNode::Text(value.to_string())
    }

    fn double(value: f64) -> Result<Self, MappingErrorKind> {
        Ok(XmlNode::Text(value.to_string()))
    }

    fn string(value: String) -> Self {
        XmlNode::Text(value)
    }

    fn array(items: Vec<Self>) -> Self {
        XmlNode::List(items)
    }

    fn object() -> Self {
        XmlNode::Element(XmlElement::default())
    }

    fn kind(&self) -> ValueKind {
        match self {
            XmlNode::Element(element) => element.kind(),
            XmlNode::List(_) => ValueKind::Array,
            XmlNode::Text(_) => ValueKind::String,
        }
    }

    fn scalar(&self, hint: ScalarKind) -> Result<Value, MappingErrorKind> {
        match self {
            XmlNode::Text(text) => Ok(parse_scalar(text, hint)),
            XmlNode::Element(element) if element.is_text_only() => {
                Ok(parse_scalar(&element.text, hint))
            }
            other => Err(expected(hint.as_str(), other.kind())),
        }
    }

    fn field(&self, name: &str) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        let XmlNode::Element(element) = self else {
            return Err(expected("object", self.kind()));
        };
        let positions = element.positions(name);
        Ok(match positions.as_slice() {
            [] => element
                .attributes
                .get(name)
                .map(|value| Cow::Owned(XmlNode::Text(value.clone()))),
            [one] => Some(Cow::Borrowed(&element.children[*one])),
            several => Some(Cow::Owned(XmlNode::List(
                several
                    .iter()
                    .map(|index| element.children[*index].clone())
                    .collect(),
            ))),
        })
    }

    fn item(&self, index: usize) -> Result<Option<Cow<'_, Self>>, MappingErrorKind> {
        match self {
            XmlNode::List(items) => Ok(items.get(index).map(Cow::Borrowed)),
            XmlNode::Element(element) if !element.is_text_only() => {
                Ok(element.children.get(index).map(Cow::Borrowed))
            }
            other => Err(expected("array", other.kind())),
        }
    }

    fn items(&self) -> Option<Cow<'_, [Self]>> {
        match self {
            XmlNode::List(items) => Some(Cow::Borrowed(items.as_slice())),
            XmlNode::Element(element) if !element.is_text_only() => {
                Some(Cow::Borrowed(element.children.as_slice()))
            }
            _ => None,
        }
    }

    fn field_names(&self) -> Vec<String> {
        let XmlNode::Element(element) = self else {
            return Vec::new();
        };
        let mut names: Vec<String> = element.attributes.keys().cloned().collect();
        for child in &element.children {
            if let Some(name) = element_name(child)
                && !names.iter().any(|known| known == name)
            {
                names.push(name.to_owned());
            }
        }
        names
    }

    fn field_mut(&mut self, name: &str) -> Result<Option<&mut Self>, MappingErrorKind> {
        let kind = self.kind();
        let XmlNode::Element(element) = self else {
            return Err(expected("object", kind));
        };
        match element.positions(name).as_slice() {
            [] => Ok(None),
            [one] => Ok(element.children.get_mut(*one)),
            _ => Err(MappingErrorKind::DataCorrupted {
                reason: format!("<{name}> occurs more than once"),
            }),
        }
    }

    fn insert_field(&mut self, name: String, value: Self) -> Result<(), MappingErrorKind> {
        let kind = self.kind();
        let XmlNode::Element(element) = self else {
            return Err(expected("object", kind));
        };
        element.attributes.shift_remove(&name);
        let position = element.positions(&name).first().copied();
        element
            .children
            .retain(|child| element_name(child) != Some(name.as_str()));
        let child = XmlNode::Element(into_element(name, value));
        match position {
            Some(index) => element.children.insert(index, child),
            None => element.children.push(child),
        }
        Ok(())
    }

    fn remove_field(&mut self, name: &str) -> Result<Option<Self>, MappingErrorKind> {
        let kind = self.kind();
        let XmlNode::Element(element) = self else {
            return Err(expected("object", kind));
        };
        let (mut removed, kept): (Vec<_>, Vec<_>) = core::mem::take(&mut element.children)
            .into_iter()
            .partition(|child| element_name(child) == Some(name));
        element.children = kept;
        Ok(match removed.len() {
            0 => element.attributes.shift_remove(name).map(XmlNode::Text),
            1 => removed.pop(),
            _ => Some(XmlNode::List(removed)),
        })
    }

    fn item_mut(&mut self, index: usize) -> Result<Option<&mut Self>, MappingErrorKind> {
        let kind = self.kind();
        match self {
            XmlNode::List(items) => Ok(items.get_mut(index)),
            XmlNode::Element(element) if !element.is_text_only() => {
                Ok(element.children.get_mut(index))
            }
            _ => Err(expected("array", kind)),
        }
    }

    fn push_item(&mut self, value: Self) -> Result<(), MappingErrorKind> {
        match self {
            XmlNode::List(items) => {
                items.push(value);
                Ok(())
            }
            XmlNode::Element(element) if !element.is_text_only() => {
                let item = into_element(ITEM_ELEMENT.to_owned(), value);
                element.children.push(XmlNode::Element(item));
                Ok(())
            }
            other => Err(expected("array", other.kind())),
        }
    }

    /// A named element keeps its name when its content is replaced.
    fn assign(&mut self, value: Self) {
        match self {
            XmlNode::Element(current) if !current.name.is_empty() => {
                let name = core::mem::take(&mut current.name);
                *current = into_element(name, value);
            }
            slot => *slot = value,
        }
    }
}
