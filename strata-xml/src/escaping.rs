//! Escaping of text and attribute values.

/// Where escaped text is going to be written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Escape {
    /// Element content: `&` `<` `>`
    Text,
    /// Double-quoted attribute values: `&` `<` `>` `"`
    Attribute,
}

impl Escape {
    fn replacement(self, byte: u8) -> Option<&'static str> {
        match byte {
            b'&' => Some("&amp;"),
            b'<' => Some("&lt;"),
            b'>' => Some("&gt;"),
            b'"' if self == Escape::Attribute => Some("&quot;"),
            _ => None,
        }
    }

    /// Append `text` to `out`, escaped for this context.
    pub(crate) fn push(self, out: &mut String, text: &str) {
        let mut start = 0;
        for (index, byte) in text.bytes().enumerate() {
            if let Some(replacement) = self.replacement(byte) {
                // every escaped byte is ASCII, so these are char boundaries
                out.push_str(&text[start..index]);
                out.push_str(replacement);
                start = index + 1;
            }
        }
        out.push_str(&text[start..]);
    }
}
