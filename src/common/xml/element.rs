//! A small owned element tree built on top of `quick-xml`.
//!
//! Slide, layout, master and chart parts are parsed once into an
//! [`XmlElement`] tree. Queries match on local names so callers never
//! depend on the prefixes a particular producer chose (`p:sp`, `sp` and
//! `pml:sp` are the same node).

use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One XML element with its attributes, direct text and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Qualified name as written in the source (e.g. `p:sp`)
    name: String,
    /// Attributes in document order, qualified keys
    attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter, used when synthesizing nodes.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child push.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a complete document and return its root element.
    ///
    /// Namespace declarations are kept as ordinary attributes. Comments,
    /// processing instructions and the XML declaration are skipped.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(Self::from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = Self::from_start(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(t.as_ref())
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        current.text.push_str(text);
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = std::str::from_utf8(t.as_ref())
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        current.text.push_str(text);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = std::str::from_utf8(r.as_ref())
                            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        push_entity(&mut current.text, name)?;
                    }
                },
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(element),
                            None => return Ok(element),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(OoxmlError::Xml("No root element found".to_string()))
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| OoxmlError::Xml(err.to_string()))?
            .to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| OoxmlError::Xml(err.to_string()))?
                .to_string();
            attributes.push((key, attr.unescape_value()?.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Qualified name, e.g. `p:sp`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the namespace prefix, e.g. `sp`.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Whether this element's local name is `local`.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Attribute lookup. A qualified key (`r:embed`) must match exactly; an
    /// unqualified key (`embed`) also matches any prefixed attribute with
    /// that local name. Namespace declarations never match.
    pub fn attr(&self, key: &str) -> Option<&str> {
        if let Some((_, value)) = self.attributes.iter().find(|(k, _)| k == key) {
            return Some(value);
        }
        if key.contains(':') {
            return None;
        }
        self.attributes
            .iter()
            .find(|(k, _)| !k.starts_with("xmlns") && local_part(k) == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed with [`str::parse`]; unparsable values read as absent.
    pub fn attr_parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.attr(key).and_then(|v| v.trim().parse().ok())
    }

    /// Boolean attribute (`1`/`true` or `0`/`false`).
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        match self.attr(key)? {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set (or replace) an attribute by exact key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Character data directly inside this element.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Character data of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    #[inline]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XmlElement> {
        &mut self.children
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|c| c.is(local))
    }

    /// Direct children with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.is(local))
    }

    /// Follow a chain of direct children by local name.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |node, local| node.child(local))
    }

    pub fn find_path_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut node = self;
        for local in path {
            node = node.child_mut(local)?;
        }
        Some(node)
    }

    /// All descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given local name.
    pub fn find(&self, local: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.is(local))
    }

    /// Every descendant with the given local name.
    pub fn find_all<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.descendants().filter(move |e| e.is(local))
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Insert a child at `index` (clamped to the end).
    pub fn insert_child(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Remove every direct child with the given local name; returns how many went.
    pub fn remove_children(&mut self, local: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !c.is(local));
        before - self.children.len()
    }
}

/// Depth-first pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[inline]
fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Append the expansion of `&name;` to `out`.
fn push_entity(out: &mut String, name: &str) -> Result<()> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        }
        .map_err(|_| OoxmlError::Xml(format!("Invalid character reference &{};", name)))?;
        let ch = char::from_u32(value)
            .ok_or_else(|| OoxmlError::Xml(format!("Invalid character reference &{};", name)))?;
        out.push(ch);
        return Ok(());
    }
    match quick_xml::escape::resolve_predefined_entity(name) {
        Some(text) => {
            out.push_str(text);
            Ok(())
        },
        None => Err(OoxmlError::Xml(format!("Unknown entity &{};", name))),
    }
}
