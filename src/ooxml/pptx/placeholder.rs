//! Placeholder identity and the per-level data a placeholder contributes.
//!
//! A slide placeholder is matched to its layout and master counterparts by
//! its [`PlaceholderKey`]. The record each level contributes
//! ([`PlaceholderRecord`]) carries its explicit geometry and the font heights
//! from its own list style.

use crate::common::xml::XmlElement;
use crate::ooxml::pptx::constants::{MAX_PARAGRAPH_LEVEL, MIN_PARAGRAPH_LEVEL, SHAPE_NODES};
use crate::ooxml::pptx::shapes::geometry::{Rect, own_transform};
use phf::phf_map;
use std::collections::BTreeMap;

/// Placeholder type (`p:ph@type`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Title,
    CenteredTitle,
    Subtitle,
    Body,
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    SlideImage,
    Picture,
    DateAndTime,
    SlideNumber,
    Footer,
    Header,
    /// Unrecognized `type` value, kept verbatim
    Custom(String),
}

static PLACEHOLDER_KINDS: phf::Map<&'static str, PlaceholderKind> = phf_map! {
    "title" => PlaceholderKind::Title,
    "ctrTitle" => PlaceholderKind::CenteredTitle,
    "subTitle" => PlaceholderKind::Subtitle,
    "body" => PlaceholderKind::Body,
    "obj" => PlaceholderKind::Object,
    "chart" => PlaceholderKind::Chart,
    "tbl" => PlaceholderKind::Table,
    "clipArt" => PlaceholderKind::ClipArt,
    "dgm" => PlaceholderKind::Diagram,
    "media" => PlaceholderKind::Media,
    "sldImg" => PlaceholderKind::SlideImage,
    "pic" => PlaceholderKind::Picture,
    "dt" => PlaceholderKind::DateAndTime,
    "sldNum" => PlaceholderKind::SlideNumber,
    "ftr" => PlaceholderKind::Footer,
    "hdr" => PlaceholderKind::Header,
};

impl PlaceholderKind {
    /// Kind from a `type` attribute; an absent attribute means `obj`.
    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value {
            None => PlaceholderKind::Object,
            Some(raw) => PLACEHOLDER_KINDS
                .get(raw)
                .cloned()
                .unwrap_or_else(|| PlaceholderKind::Custom(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlaceholderKind::Title => "title",
            PlaceholderKind::CenteredTitle => "ctrTitle",
            PlaceholderKind::Subtitle => "subTitle",
            PlaceholderKind::Body => "body",
            PlaceholderKind::Object => "obj",
            PlaceholderKind::Chart => "chart",
            PlaceholderKind::Table => "tbl",
            PlaceholderKind::ClipArt => "clipArt",
            PlaceholderKind::Diagram => "dgm",
            PlaceholderKind::Media => "media",
            PlaceholderKind::SlideImage => "sldImg",
            PlaceholderKind::Picture => "pic",
            PlaceholderKind::DateAndTime => "dt",
            PlaceholderKind::SlideNumber => "sldNum",
            PlaceholderKind::Footer => "ftr",
            PlaceholderKind::Header => "hdr",
            PlaceholderKind::Custom(raw) => raw,
        }
    }

    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, PlaceholderKind::Title | PlaceholderKind::CenteredTitle)
    }

    /// Kinds whose text falls back to the master title style.
    #[inline]
    pub fn uses_title_style(&self) -> bool {
        self.is_title() || matches!(self, PlaceholderKind::Subtitle)
    }

}

/// Normalized `(kind, index)` identity of a placeholder.
///
/// Title and centered-title placeholders collapse to the same key with
/// index `Some(0)`, so a `ctrTitle` on a slide matches a `title` on its master.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderKey {
    kind: PlaceholderKind,
    index: Option<u32>,
}

impl PlaceholderKey {
    pub fn new(kind: PlaceholderKind, index: Option<u32>) -> Self {
        if kind.is_title() {
            Self {
                kind: PlaceholderKind::Title,
                index: Some(0),
            }
        } else {
            Self { kind, index }
        }
    }

    /// Key of a shape node, if it is a placeholder.
    pub fn from_shape(shape: &XmlElement) -> Option<Self> {
        let ph = placeholder_element(shape)?;
        Some(Self::new(
            PlaceholderKind::from_type_attr(ph.attr("type")),
            ph.attr_parse("idx"),
        ))
    }

    #[inline]
    pub fn kind(&self) -> &PlaceholderKind {
        &self.kind
    }

    #[inline]
    pub fn index(&self) -> Option<u32> {
        self.index
    }
}

/// The `p:ph` element of a shape: `nv*Pr/p:nvPr/p:ph`.
pub fn placeholder_element(shape: &XmlElement) -> Option<&XmlElement> {
    shape
        .children()
        .iter()
        .find(|c| c.local_name().starts_with("nv"))?
        .child("nvPr")?
        .child("ph")
}

/// What one level of the inheritance chain says about a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderRecord {
    pub key: PlaceholderKey,
    pub geometry: Option<Rect>,
    /// Font heights (hundredths of a point) by paragraph level 1..=9
    pub font_heights_by_level: BTreeMap<u32, u32>,
}

impl PlaceholderRecord {
    /// Record for a placeholder shape; `None` if the shape is not a placeholder.
    pub fn from_shape(shape: &XmlElement) -> Option<Self> {
        let key = PlaceholderKey::from_shape(shape)?;
        Some(Self {
            key,
            geometry: own_transform(shape),
            font_heights_by_level: shape
                .find_path(&["txBody", "lstStyle"])
                .map(list_style_font_heights)
                .unwrap_or_default(),
        })
    }
}

/// Every placeholder record on a layout or master (`p:cSld/p:spTree`),
/// in document order.
pub fn collect_records(part_root: &XmlElement) -> Vec<PlaceholderRecord> {
    let Some(tree) = part_root.find_path(&["cSld", "spTree"]) else {
        return Vec::new();
    };
    tree.descendants()
        .filter(|e| SHAPE_NODES.contains(&e.local_name()))
        .filter_map(PlaceholderRecord::from_shape)
        .collect()
}

/// First record whose key equals `key`. Kind and index must both match.
pub fn find_record<'a>(
    records: &'a [PlaceholderRecord],
    key: &PlaceholderKey,
) -> Option<&'a PlaceholderRecord> {
    records.iter().find(|r| &r.key == key)
}

/// Font heights of a list style (`a:lstStyle`, `p:titleStyle`,
/// `p:defaultTextStyle`, ...): `a:lvlNpPr/a:defRPr@sz` by level.
pub fn list_style_font_heights(list_style: &XmlElement) -> BTreeMap<u32, u32> {
    (MIN_PARAGRAPH_LEVEL..=MAX_PARAGRAPH_LEVEL)
        .filter_map(|level| {
            let size = list_style
                .child(&format!("lvl{}pPr", level))?
                .child("defRPr")?
                .attr_parse::<u32>("sz")?;
            Some((level, size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(ph: &str) -> XmlElement {
        XmlElement::parse(
            format!(
                r#"<p:sp xmlns:p="urn:p" xmlns:a="urn:a"><p:nvSpPr><p:cNvPr id="2" name="x"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="100" cy="50"/></a:xfrm></p:spPr>
<p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr><a:lvl3pPr><a:defRPr sz="2000"/></a:lvl3pPr></a:lstStyle></p:txBody></p:sp>"#
            )
            .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_key_from_shape() {
        let key = PlaceholderKey::from_shape(&shape(r#"<p:ph type="body" idx="1"/>"#)).unwrap();
        assert_eq!(key.kind(), &PlaceholderKind::Body);
        assert_eq!(key.index(), Some(1));

        let key = PlaceholderKey::from_shape(&shape(r#"<p:ph idx="3"/>"#)).unwrap();
        assert_eq!(key.kind(), &PlaceholderKind::Object);

        let key = PlaceholderKey::from_shape(&shape(r#"<p:ph type="myType"/>"#)).unwrap();
        assert_eq!(key.kind(), &PlaceholderKind::Custom("myType".into()));

        assert!(PlaceholderKey::from_shape(&shape("")).is_none());
    }

    #[test]
    fn test_title_kinds_share_a_key() {
        let title = PlaceholderKey::from_shape(&shape(r#"<p:ph type="title"/>"#)).unwrap();
        let centered = PlaceholderKey::from_shape(&shape(r#"<p:ph type="ctrTitle" idx="4"/>"#)).unwrap();
        assert_eq!(title, centered);
        assert_eq!(centered.index(), Some(0));
    }

    #[test]
    fn test_record_contents() {
        let record = PlaceholderRecord::from_shape(&shape(r#"<p:ph type="title"/>"#)).unwrap();
        assert_eq!(record.geometry, Some(Rect::new(10, 20, 100, 50)));
        assert_eq!(
            record.font_heights_by_level,
            BTreeMap::from([(1, 4400), (3, 2000)])
        );
    }

    fn record(kind: PlaceholderKind, index: u32, at: i64) -> PlaceholderRecord {
        PlaceholderRecord {
            key: PlaceholderKey::new(kind, Some(index)),
            geometry: Some(Rect::new(at, at, at, at)),
            font_heights_by_level: BTreeMap::new(),
        }
    }

    #[test]
    fn test_find_record_needs_kind_and_index() {
        let records = vec![
            record(PlaceholderKind::Body, 1, 1),
            record(PlaceholderKind::Object, 2, 2),
            record(PlaceholderKind::Footer, 3, 3),
        ];
        let found = find_record(&records, &PlaceholderKey::new(PlaceholderKind::Object, Some(2)));
        assert_eq!(found.unwrap().geometry, Some(Rect::new(2, 2, 2, 2)));

        // Same index, different kind
        assert!(find_record(&records, &PlaceholderKey::new(PlaceholderKind::Object, Some(1))).is_none());
        // Same kind, different index
        assert!(find_record(&records, &PlaceholderKey::new(PlaceholderKind::Object, Some(7))).is_none());
        assert!(find_record(&records, &PlaceholderKey::new(PlaceholderKind::Footer, Some(11))).is_none());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_title_and_centered_title_keys_are_equal(
                a in proptest::option::of(0u32..10_000),
                b in proptest::option::of(0u32..10_000),
            ) {
                let title = PlaceholderKey::new(PlaceholderKind::Title, a);
                let centered = PlaceholderKey::new(PlaceholderKind::CenteredTitle, b);
                prop_assert_eq!(&title, &centered);
                prop_assert_eq!(centered.index(), Some(0));
            }

            #[test]
            fn prop_other_kinds_keep_their_index(index in proptest::option::of(0u32..10_000)) {
                let key = PlaceholderKey::new(PlaceholderKind::Footer, index);
                prop_assert_eq!(key.index(), index);
            }
        }
    }
}
