//! Printing an element tree as XML text.

use std::borrow::Cow;

use strata_value::{MappingError, MappingErrorKind};

use crate::escaping::Escape;
use crate::{ITEM_ELEMENT, XmlElement, XmlNode};

/// Options for [`to_string_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlWriteOptions {
    /// Put each child element on its own indented line (default: false)
    pub pretty: bool,
    /// Indentation used when pretty-printing (default: two spaces)
    pub indent: Cow<'static, str>,
}

impl Default for XmlWriteOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: Cow::Borrowed("  "),
        }
    }
}

impl XmlWriteOptions {
    /// Compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing with the default indentation.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set the indentation string. Implies pretty-printing.
    pub fn indent(mut self, indent: impl Into<Cow<'static, str>>) -> Self {
        self.indent = indent.into();
        self.pretty = true;
        self
    }
}

/// Print `tree` as a document whose root element is called `root_name`.
///
/// The root must be an element or text; an array has no single root element
/// and fails with [`MappingErrorKind::CannotRepresentAsArray`].
pub fn to_string(tree: &XmlNode, root_name: &str) -> Result<String, MappingError> {
    to_string_with(tree, root_name, &XmlWriteOptions::default())
}

/// [`to_string`] with explicit options.
pub fn to_string_with(
    tree: &XmlNode,
    root_name: &str,
    options: &XmlWriteOptions,
) -> Result<String, MappingError> {
    let root = match tree {
        XmlNode::Element(element) => Cow::Borrowed(element),
        XmlNode::Text(text) => Cow::Owned(XmlElement::with_text(root_name, text.as_str())),
        XmlNode::List(_) => {
            return Err(MappingError::new(MappingErrorKind::CannotRepresentAsArray));
        }
    };
    let mut writer = Writer {
        out: String::new(),
        options,
    };
    writer.element(root_name, &root, 0);
    Ok(writer.out)
}

struct Writer<'o> {
    out: String,
    options: &'o XmlWriteOptions,
}

impl Writer<'_> {
    fn element(&mut self, name: &str, element: &XmlElement, depth: usize) {
        self.out.push('<');
        self.out.push_str(name);
        for (attribute, value) in &element.attributes {
            self.out.push(' ');
            self.out.push_str(attribute);
            self.out.push_str("=\"");
            Escape::Attribute.push(&mut self.out, value);
            self.out.push('"');
        }

        if element.children.is_empty() && element.text.is_empty() {
            self.out.push_str("/>");
            return;
        }

        self.out.push('>');
        Escape::Text.push(&mut self.out, &element.text);
        for child in &element.children {
            self.newline(depth + 1);
            self.node(child, depth + 1);
        }
        if !element.children.is_empty() {
            self.newline(depth);
        }
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn node(&mut self, node: &XmlNode, depth: usize) {
        match node {
            XmlNode::Element(element) => {
                let name = if element.name.is_empty() {
                    ITEM_ELEMENT
                } else {
                    element.name.as_str()
                };
                self.element(name, element, depth);
            }
            XmlNode::Text(text) => Escape::Text.push(&mut self.out, text),
            XmlNode::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        self.newline(depth);
                    }
                    self.node(item, depth);
                }
            }
        }
    }

    fn newline(&mut self, depth: usize) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push_str(&self.options.indent);
            }
        }
    }
}
