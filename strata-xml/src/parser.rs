//! Reading XML text into an element tree.

use quick_xml::Reader;
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::Event;

use crate::tracing_macros::trace;
use crate::{XmlElement, XmlError, XmlNode};

/// Parse XML text. The result is always an [`XmlNode::Element`].
pub fn from_str(input: &str) -> Result<XmlNode, XmlError> {
    from_slice(input.as_bytes())
}

/// Parse XML bytes. The result is always an [`XmlNode::Element`].
pub fn from_slice(input: &[u8]) -> Result<XmlNode, XmlError> {
    trace!(len = input.len(), "parsing XML");
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmlError::Parse(e.to_string()))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = core::str::from_utf8(e.local_name().as_ref())
                    .map_err(XmlError::InvalidUtf8)?
                    .to_owned();
                let mut element = XmlElement::new(name);

                for attr in e.attributes() {
                    let attr = attr.map_err(|e| XmlError::Parse(e.to_string()))?;
                    let key = attr.key;
                    if key.as_ref() == b"xmlns"
                        || key.prefix().is_some_and(|prefix| prefix.as_ref() == b"xmlns")
                    {
                        continue;
                    }
                    let attr_name = core::str::from_utf8(key.local_name().as_ref())
                        .map_err(XmlError::InvalidUtf8)?
                        .to_owned();
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .map_err(|e| XmlError::Parse(e.to_string()))?
                        .into_owned();
                    element.attributes.insert(attr_name, value);
                }

                if matches!(event, Event::Start(_)) {
                    stack.push(element);
                } else {
                    attach(&mut stack, element, &mut root)?;
                }
            }
            Event::End(_) => {
                let mut element = stack.pop().ok_or(XmlError::UnbalancedTags)?;
                let trimmed = element.text.trim();
                if trimmed.len() != element.text.len() {
                    element.text = trimmed.to_owned();
                }
                attach(&mut stack, element, &mut root)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .decode()
                        .map_err(|err| XmlError::Parse(err.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = core::str::from_utf8(e.as_ref()).map_err(XmlError::InvalidUtf8)?;
                    current.text.push_str(text);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(current) = stack.last_mut() {
                    let raw = e
                        .decode()
                        .map_err(|err| XmlError::Parse(err.to_string()))?;
                    current.text.push_str(&resolve_entity(&raw)?);
                }
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::UnbalancedTags);
    }
    root.map(XmlNode::Element).ok_or(XmlError::UnexpectedEof)
}

fn attach(
    stack: &mut [XmlElement],
    element: XmlElement,
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(XmlError::MultipleRoots);
    }
    Ok(())
}

/// The text of an entity reference: named (`lt`) or numeric (`#10`, `#x9`).
/// Unknown names are kept as written.
fn resolve_entity(raw: &str) -> Result<String, XmlError> {
    if let Some(resolved) = resolve_xml_entity(raw) {
        return Ok(resolved.into());
    }

    let Some(number) = raw.strip_prefix('#') else {
        return Ok(format!("&{raw};"));
    };
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    }
    .map_err(|_| XmlError::Parse(format!("invalid character reference &{raw};")))?;
    char::from_u32(code)
        .map(String::from)
        .ok_or_else(|| XmlError::Parse(format!("invalid code point {code}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities() {
        assert_eq!(resolve_entity("amp").unwrap(), "&");
        assert_eq!(resolve_entity("#65").unwrap(), "A");
        assert_eq!(resolve_entity("#x263A").unwrap(), "☺");
        assert_eq!(resolve_entity("nbsp").unwrap(), "&nbsp;");
        insta::assert_snapshot!(resolve_entity("#xZZ").unwrap_err(), @"XML parse error: invalid character reference &#xZZ;");
    }
}
