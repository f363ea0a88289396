//! Shared strings table for embedded workbooks.
//!
//! Cells of type `s` store an index into this table. Each `<si>` item is
//! either a plain `<t>` or a list of rich-text runs (`<r><t>..</t></r>`);
//! runs are concatenated and phonetic hints (`<rPh>`) are skipped.

use crate::common::xml::XmlElement;
use crate::ooxml::error::Result;
use memchr::{memchr, memmem};

/// Shared strings table, in index order.
#[derive(Debug, Default, Clone)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `xl/sharedStrings.xml`.
    ///
    /// Unprefixed items are scanned for directly; a part whose elements carry
    /// a namespace prefix (`<x:sst>`, `<x:si>`) is parsed as a whole.
    pub fn parse(content: &[u8]) -> Result<Self> {
        if root_is_prefixed(content) {
            let root = XmlElement::parse(content)?;
            return Ok(Self {
                strings: root.children_named("si").map(item_text).collect(),
            });
        }

        let open = memmem::Finder::new(b"<si");
        let close = memmem::Finder::new(b"</si>");
        let mut strings = Vec::new();
        let mut pos = 0;

        while let Some(found) = open.find(&content[pos..]) {
            let start = pos + found;
            // Skip `<sst ...>` itself and any other tag that merely begins with "si"
            match content.get(start + 3) {
                Some(b'>' | b' ' | b'\t' | b'\r' | b'\n') => {},
                Some(b'/') => {
                    strings.push(String::new());
                    pos = start + 3;
                    continue;
                },
                _ => {
                    pos = start + 3;
                    continue;
                },
            }
            let Some(len) = close.find(&content[start..]) else {
                break;
            };
            let end = start + len + b"</si>".len();
            let item = XmlElement::parse(&content[start..end])?;
            strings.push(item_text(&item));
            pos = end;
        }

        Ok(Self { strings })
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Whether the first element of `content` has a prefixed name.
fn root_is_prefixed(content: &[u8]) -> bool {
    let mut pos = 0;
    while let Some(found) = memchr(b'<', &content[pos..]) {
        let start = pos + found + 1;
        match content.get(start) {
            Some(b'?' | b'!') => pos = start,
            Some(_) => {
                return content[start..]
                    .iter()
                    .take_while(|&&b| !b.is_ascii_whitespace() && b != b'>' && b != b'/')
                    .any(|&b| b == b':');
            },
            None => return false,
        }
    }
    false
}

/// Text of one `<si>` (or `<is>`) item.
pub(crate) fn item_text(item: &XmlElement) -> String {
    let mut text = String::new();
    for child in item.children() {
        match child.local_name() {
            "t" => text.push_str(child.text()),
            "r" => {
                if let Some(t) = child.child("t") {
                    text.push_str(t.text());
                }
            },
            _ => {},
        }
    }
    text
}
