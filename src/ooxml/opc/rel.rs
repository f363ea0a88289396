//! Relationship parts (`_rels/*.rels`) of an OPC package.
//!
//! Relationships are read-only here. They are parsed once per source part and
//! used to follow slide → layout → master links, image blips and chart data.
use crate::ooxml::opc::constants::{relationship_type, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a relative part reference or external URL
    target_ref: String,

    /// Whether the target lives outside the package
    is_external: bool,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// All relationships whose source is one part.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Directory of the source part; relative targets resolve against it
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create an empty collection for a source part living in `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: HashMap::new(),
        }
    }

    /// Parse a `.rels` part.
    pub fn from_xml(base_uri: impl Into<String>, rels_xml: &[u8]) -> Result<Self> {
        let mut rels = Self::new(base_uri);
        let mut reader = Reader::from_reader(rels_xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = None;
                        let mut target_ref = None;
                        let mut is_external = false;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr.unescape_value()?.into_owned()),
                                b"Type" => reltype = Some(attr.unescape_value()?.into_owned()),
                                b"Target" => target_ref = Some(attr.unescape_value()?.into_owned()),
                                b"TargetMode" => {
                                    is_external = attr.unescape_value()? == target_mode::EXTERNAL;
                                },
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                            rels.add(Relationship::new(id, rt, tr, is_external));
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(rels)
    }

    pub fn add(&mut self, rel: Relationship) {
        self.rels.insert(rel.r_id.clone(), rel);
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    #[inline]
    pub fn contains(&self, r_id: &str) -> bool {
        self.rels.contains_key(r_id)
    }

    /// Absolute part name targeted by `r_id`.
    pub fn target_partname(&self, r_id: &str) -> Result<PackURI> {
        let rel = self.get(r_id).ok_or_else(|| OpcError::RelationshipNotFound {
            source_part: self.base_uri.clone(),
            r_id: r_id.to_string(),
        })?;
        if rel.is_external {
            return Err(OpcError::InvalidRelationship(format!(
                "{} points outside the package ({})",
                r_id, rel.target_ref
            )));
        }
        PackURI::from_rel_ref(&self.base_uri, &rel.target_ref)
    }

    /// First relationship of the given type, in rId order for determinism.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        let mut matching: Vec<&Relationship> = self
            .rels
            .values()
            .filter(|rel| relationship_type::matches(rel.reltype(), reltype))
            .collect();
        matching.sort_by(|a, b| rid_order(a.r_id(), b.r_id()));
        matching.into_iter().next()
    }

    /// Whether `r_id` exists and has the given type.
    pub fn has_of_type(&self, r_id: &str, reltype: &str) -> bool {
        self.get(r_id)
            .is_some_and(|rel| relationship_type::matches(rel.reltype(), reltype))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }
}

/// Order "rId2" before "rId10"; ids without a numeric suffix sort last.
fn rid_order(a: &str, b: &str) -> std::cmp::Ordering {
    let num = |s: &str| s.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok());
    match (num(a), num(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId10" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image2.png"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::from_xml("/ppt/slides", SLIDE_RELS.as_bytes()).unwrap();
        assert_eq!(rels.len(), 4);
        assert!(rels.get("rId3").unwrap().is_external());
        assert_eq!(
            rels.target_partname("rId1").unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_first_of_type_uses_rid_order() {
        let rels = Relationships::from_xml("/ppt/slides", SLIDE_RELS.as_bytes()).unwrap();
        let image = rels.first_of_type(relationship_type::IMAGE).unwrap();
        assert_eq!(image.r_id(), "rId2");
    }

    #[test]
    fn test_missing_and_external_targets() {
        let rels = Relationships::from_xml("/ppt/slides", SLIDE_RELS.as_bytes()).unwrap();
        assert!(matches!(
            rels.target_partname("rId99"),
            Err(OpcError::RelationshipNotFound { .. })
        ));
        assert!(matches!(
            rels.target_partname("rId3"),
            Err(OpcError::InvalidRelationship(_))
        ));
        assert!(rels.has_of_type("rId2", relationship_type::IMAGE));
        assert!(!rels.has_of_type("rId1", relationship_type::IMAGE));
    }
}
