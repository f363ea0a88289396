//! Effective style resolution through the slide → layout → master chain.
//!
//! A placeholder shape that does not state its own geometry or font sizes
//! takes them from the matching placeholder on its layout, then its master,
//! then from the master text styles and the presentation defaults. The
//! chain is rebuilt on every lookup: layouts and masters may be edited
//! independently of the shapes that inherit from them.

use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::constants::{DEFAULT_FONT_HEIGHT, MAX_PARAGRAPH_LEVEL, MIN_PARAGRAPH_LEVEL};
use crate::ooxml::pptx::fill::{FillDescriptor, background_fill};
use crate::ooxml::pptx::placeholder::{
    PlaceholderKey, PlaceholderRecord, collect_records, find_record, list_style_font_heights,
};
use crate::ooxml::pptx::shapes::geometry::{GroupTransform, Rect, own_transform, to_absolute};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// The parts a slide's shapes inherit from.
///
/// Every level is optional so a layout or master can be resolved on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideAncestry<'a> {
    pub slide: Option<&'a XmlElement>,
    pub layout: Option<&'a XmlElement>,
    pub master: Option<&'a XmlElement>,
    /// `p:presentation/p:defaultTextStyle`
    pub default_text_style: Option<&'a XmlElement>,
}

impl<'a> SlideAncestry<'a> {
    pub fn new(
        slide: Option<&'a XmlElement>,
        layout: Option<&'a XmlElement>,
        master: Option<&'a XmlElement>,
    ) -> Self {
        Self {
            slide,
            layout,
            master,
            default_text_style: None,
        }
    }

    pub fn with_default_text_style(mut self, style: Option<&'a XmlElement>) -> Self {
        self.default_text_style = style;
        self
    }

    /// Present parts, slide first.
    pub fn parts(&self) -> impl Iterator<Item = &'a XmlElement> {
        [self.slide, self.layout, self.master].into_iter().flatten()
    }

    /// A master text style list (`p:txStyles/p:titleStyle` and friends).
    fn master_text_style(&self, local: &str) -> Option<&'a XmlElement> {
        self.master?.find_path(&["txStyles", local])
    }
}

/// What each level of the chain says about one placeholder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InheritanceChain {
    pub slide_level: Option<PlaceholderRecord>,
    pub layout_level: Option<PlaceholderRecord>,
    pub master_level: Option<PlaceholderRecord>,
}

impl InheritanceChain {
    /// Build the chain for a placeholder shape. Non-placeholders get an
    /// empty chain.
    pub fn build(shape: &XmlElement, ancestry: &SlideAncestry<'_>) -> Self {
        let Some(slide_level) = PlaceholderRecord::from_shape(shape) else {
            return Self::default();
        };
        let lookup = |part: Option<&XmlElement>| {
            part.and_then(|root| find_record(&collect_records(root), &slide_level.key).cloned())
        };
        Self {
            layout_level: lookup(ancestry.layout),
            master_level: lookup(ancestry.master),
            slide_level: Some(slide_level),
        }
    }

    pub fn key(&self) -> Option<&PlaceholderKey> {
        self.slide_level.as_ref().map(|r| &r.key)
    }

    /// First inherited geometry: layout, then master.
    pub fn inherited_geometry(&self) -> Option<Rect> {
        [&self.layout_level, &self.master_level]
            .into_iter()
            .flatten()
            .find_map(|record| record.geometry)
    }
}

/// Where a resolved font height came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    Run,
    Shape,
    Layout,
    Master,
    MasterTitleStyle,
    MasterTextStyle,
    DocumentDefault,
    Fallback,
}

/// Resolved geometry, font sizes and fill of a shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectiveStyle {
    /// Absolute geometry in EMUs; `None` when nothing in the chain defines one
    pub geometry: Option<Rect>,
    /// Font height in hundredths of a point for every level 1..=9
    pub font_height_by_level: BTreeMap<u32, u32>,
    pub fill: FillDescriptor,
}

impl EffectiveStyle {
    /// Font height at a paragraph level (1..=9).
    pub fn font_height(&self, level: u32) -> Result<u32> {
        check_level(level)?;
        Ok(self
            .font_height_by_level
            .get(&level)
            .copied()
            .unwrap_or(DEFAULT_FONT_HEIGHT))
    }
}

fn check_level(level: u32) -> Result<()> {
    if (MIN_PARAGRAPH_LEVEL..=MAX_PARAGRAPH_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(OoxmlError::InvalidParagraphLevel(level))
    }
}

/// Resolve the effective style of `shape`.
///
/// `enclosing_groups` lists the transforms of the groups containing the
/// shape, innermost first; it is empty for top-level shapes.
pub fn resolve_style(
    shape: &XmlElement,
    enclosing_groups: &[GroupTransform],
    ancestry: &SlideAncestry<'_>,
) -> EffectiveStyle {
    let chain = InheritanceChain::build(shape, ancestry);

    let geometry = match own_transform(shape) {
        Some(local) => Some(to_absolute(local, enclosing_groups)),
        None => chain.inherited_geometry(),
    };

    let font_height_by_level = (MIN_PARAGRAPH_LEVEL..=MAX_PARAGRAPH_LEVEL)
        .map(|level| (level, resolve_level(shape, &chain, ancestry, level).0))
        .collect();

    EffectiveStyle {
        geometry,
        font_height_by_level,
        fill: resolve_fill(shape, ancestry),
    }
}

/// Font height of `shape` at a paragraph level, ignoring run overrides.
pub fn font_height(shape: &XmlElement, level: u32, ancestry: &SlideAncestry<'_>) -> Result<u32> {
    check_level(level)?;
    let chain = InheritanceChain::build(shape, ancestry);
    Ok(resolve_level(shape, &chain, ancestry, level).0)
}

/// Font height of a text run: its own `a:rPr@sz`, then the inherited value
/// for its paragraph's level (`a:pPr@lvl` is zero-based).
pub fn font_height_for_run(
    shape: &XmlElement,
    paragraph: &XmlElement,
    run: &XmlElement,
    ancestry: &SlideAncestry<'_>,
) -> Result<u32> {
    let lvl = paragraph
        .child("pPr")
        .and_then(|p| p.attr_parse::<u32>("lvl"))
        .unwrap_or(0);
    let level = lvl
        .checked_add(1)
        .ok_or(OoxmlError::InvalidParagraphLevel(lvl))?;
    check_level(level)?;

    if let Some(size) = run.child("rPr").and_then(|r| r.attr_parse::<u32>("sz")) {
        debug!(level, size, source = ?FontSource::Run, "resolved font height");
        return Ok(size);
    }
    font_height(shape, level, ancestry)
}

fn resolve_level(
    shape: &XmlElement,
    chain: &InheritanceChain,
    ancestry: &SlideAncestry<'_>,
    level: u32,
) -> (u32, FontSource) {
    let from_map = |map: &BTreeMap<u32, u32>| map.get(&level).copied();
    let from_list = |list: Option<&XmlElement>| list.and_then(|l| from_map(&list_style_font_heights(l)));

    let resolved = match chain.key() {
        None => from_list(shape.find_path(&["txBody", "lstStyle"]))
            .map(|h| (h, FontSource::Shape)),
        Some(key) => {
            let record_level = |record: &Option<PlaceholderRecord>| {
                record
                    .as_ref()
                    .and_then(|r| from_map(&r.font_heights_by_level))
            };
            record_level(&chain.slide_level)
                .map(|h| (h, FontSource::Shape))
                .or_else(|| record_level(&chain.layout_level).map(|h| (h, FontSource::Layout)))
                .or_else(|| record_level(&chain.master_level).map(|h| (h, FontSource::Master)))
                .or_else(|| {
                    if !key.kind().uses_title_style() {
                        return None;
                    }
                    ancestry
                        .master_text_style("titleStyle")
                        .and_then(|style| list_style_font_heights(style).get(&1).copied())
                        .map(|h| (h, FontSource::MasterTitleStyle))
                })
                .or_else(|| {
                    from_list(ancestry.master_text_style("otherStyle"))
                        .map(|h| (h, FontSource::MasterTextStyle))
                })
        },
    };

    let (height, source) = resolved
        .or_else(|| from_list(ancestry.default_text_style).map(|h| (h, FontSource::DocumentDefault)))
        .unwrap_or((DEFAULT_FONT_HEIGHT, FontSource::Fallback));
    debug!(level, height, ?source, "resolved font height");
    (height, source)
}

/// `useBgFill` → background; explicit fill; theme fill reference; `NoFill`.
fn resolve_fill(shape: &XmlElement, ancestry: &SlideAncestry<'_>) -> FillDescriptor {
    if shape.attr_bool("useBgFill").unwrap_or(false) {
        return background_fill(ancestry.parts());
    }
    let properties = match shape.local_name() {
        "grpSp" => shape.child("grpSpPr"),
        _ => shape.child("spPr"),
    };
    properties
        .and_then(FillDescriptor::from_properties)
        .or_else(|| {
            shape
                .find_path(&["style", "fillRef"])
                .and_then(FillDescriptor::from_reference)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::fill::Color;

    const NS: &str = r#"xmlns:p="urn:p" xmlns:a="urn:a""#;

    fn parse(xml: String) -> XmlElement {
        XmlElement::parse(xml.as_bytes()).unwrap()
    }

    fn placeholder(ph: &str, sp_pr: &str, lst_style: &str) -> String {
        format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="ph"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>{sp_pr}</p:spPr><p:txBody><a:bodyPr/><a:lstStyle>{lst_style}</a:lstStyle><a:p/></p:txBody></p:sp>"#
        )
    }

    fn part(root: &str, shapes: &str, extra: &str) -> XmlElement {
        parse(format!(
            r#"<p:{root} {NS}><p:cSld><p:spTree><p:nvGrpSpPr/><p:grpSpPr/>{shapes}</p:spTree></p:cSld>{extra}</p:{root}>"#
        ))
    }

    fn shape(xml: String) -> XmlElement {
        parse(xml.replacen("<p:sp>", &format!("<p:sp {NS}>"), 1))
    }

    const XFRM: &str = r#"<a:xfrm><a:off x="10" y="20"/><a:ext cx="100" cy="50"/></a:xfrm>"#;

    #[test]
    fn test_master_level_font_height_and_fallbacks() {
        let slide_shape = shape(placeholder(r#"<p:ph type="body" idx="1"/>"#, "", ""));
        let layout = part(
            "sldLayout",
            &placeholder(r#"<p:ph type="body" idx="1"/>"#, "", ""),
            "",
        );
        let master = part(
            "sldMaster",
            &placeholder(
                r#"<p:ph type="body" idx="1"/>"#,
                "",
                r#"<a:lvl2pPr><a:defRPr sz="2400"/></a:lvl2pPr>"#,
            ),
            "",
        );

        let ancestry = SlideAncestry::new(None, Some(&layout), Some(&master));
        assert_eq!(font_height(&slide_shape, 2, &ancestry).unwrap(), 2400);
        assert_eq!(font_height(&slide_shape, 5, &ancestry).unwrap(), DEFAULT_FONT_HEIGHT);

        let defaults = parse(format!(
            r#"<p:defaultTextStyle {NS}><a:lvl5pPr><a:defRPr sz="1400"/></a:lvl5pPr></p:defaultTextStyle>"#
        ));
        let ancestry = ancestry.with_default_text_style(Some(&defaults));
        assert_eq!(font_height(&slide_shape, 5, &ancestry).unwrap(), 1400);
        assert_eq!(font_height(&slide_shape, 2, &ancestry).unwrap(), 2400);
    }

    #[test]
    fn test_chain_order() {
        let slide_shape = shape(placeholder(
            r#"<p:ph type="body" idx="1"/>"#,
            "",
            r#"<a:lvl1pPr><a:defRPr sz="1000"/></a:lvl1pPr>"#,
        ));
        let layout = part(
            "sldLayout",
            &placeholder(
                r#"<p:ph type="body" idx="1"/>"#,
                "",
                r#"<a:lvl1pPr><a:defRPr sz="2000"/></a:lvl1pPr><a:lvl2pPr><a:defRPr sz="2100"/></a:lvl2pPr>"#,
            ),
            "",
        );
        let master = part(
            "sldMaster",
            &placeholder(
                r#"<p:ph type="body" idx="1"/>"#,
                "",
                r#"<a:lvl2pPr><a:defRPr sz="3100"/></a:lvl2pPr><a:lvl3pPr><a:defRPr sz="3200"/></a:lvl3pPr>"#,
            ),
            r#"<p:txStyles><p:bodyStyle><a:lvl4pPr><a:defRPr sz="5000"/></a:lvl4pPr></p:bodyStyle>
<p:otherStyle><a:lvl4pPr><a:defRPr sz="4000"/></a:lvl4pPr></p:otherStyle></p:txStyles>"#,
        );
        let ancestry = SlideAncestry::new(None, Some(&layout), Some(&master));
        let style = resolve_style(&slide_shape, &[], &ancestry);

        assert_eq!(style.font_height(1).unwrap(), 1000);
        assert_eq!(style.font_height(2).unwrap(), 2100);
        assert_eq!(style.font_height(3).unwrap(), 3200);
        assert_eq!(style.font_height(4).unwrap(), 4000);
        assert_eq!(style.font_height(9).unwrap(), DEFAULT_FONT_HEIGHT);
    }

    #[test]
    fn test_title_uses_master_title_style() {
        let slide_shape = shape(placeholder(r#"<p:ph type="ctrTitle"/>"#, "", ""));
        let master = part(
            "sldMaster",
            &placeholder(r#"<p:ph type="title"/>"#, XFRM, ""),
            r#"<p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle>
<p:otherStyle><a:lvl1pPr><a:defRPr sz="1200"/></a:lvl1pPr></p:otherStyle></p:txStyles>"#,
        );
        let ancestry = SlideAncestry::new(None, None, Some(&master));
        let style = resolve_style(&slide_shape, &[], &ancestry);

        // A single value for every level
        assert_eq!(style.font_height(1).unwrap(), 4400);
        assert_eq!(style.font_height(3).unwrap(), 4400);
        assert_eq!(style.geometry, Some(Rect::new(10, 20, 100, 50)));
    }

    #[test]
    fn test_geometry_layout_then_master() {
        let slide_shape = shape(placeholder(r#"<p:ph type="body" idx="1"/>"#, "", ""));
        let layout = part(
            "sldLayout",
            &placeholder(r#"<p:ph type="body" idx="1"/>"#, XFRM, ""),
            "",
        );
        let master = part(
            "sldMaster",
            &placeholder(
                r#"<p:ph type="body" idx="1"/>"#,
                r#"<a:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></a:xfrm>"#,
                "",
            ),
            "",
        );

        let with_layout = SlideAncestry::new(None, Some(&layout), Some(&master));
        assert_eq!(
            resolve_style(&slide_shape, &[], &with_layout).geometry,
            Some(Rect::new(10, 20, 100, 50))
        );

        let empty_layout = part("sldLayout", "", "");
        let without_layout = SlideAncestry::new(None, Some(&empty_layout), Some(&master));
        assert_eq!(
            resolve_style(&slide_shape, &[], &without_layout).geometry,
            Some(Rect::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn test_unmatched_placeholder_defaults() {
        let slide_shape = shape(placeholder(r#"<p:ph type="ftr" idx="11"/>"#, "", ""));
        let master = part("sldMaster", "", "");
        let ancestry = SlideAncestry::new(None, None, Some(&master));
        let style = resolve_style(&slide_shape, &[], &ancestry);
        assert_eq!(style.geometry, None);
        assert!(style.font_height_by_level.values().all(|&h| h == DEFAULT_FONT_HEIGHT));
    }

    #[test]
    fn test_footer_with_another_index_inherits_nothing() {
        let slide_shape = shape(placeholder(r#"<p:ph type="ftr" idx="11"/>"#, "", ""));
        let master = part(
            "sldMaster",
            &placeholder(
                r#"<p:ph type="ftr" idx="3"/>"#,
                r#"<a:xfrm><a:off x="7" y="7"/><a:ext cx="7" cy="7"/></a:xfrm>"#,
                r#"<a:lvl1pPr><a:defRPr sz="1000"/></a:lvl1pPr>"#,
            ),
            "",
        );
        let ancestry = SlideAncestry::new(None, None, Some(&master));
        let style = resolve_style(&slide_shape, &[], &ancestry);
        assert_eq!(style.geometry, None);
        assert_eq!(style.font_height(1).unwrap(), 1800);

        let same_index = shape(placeholder(r#"<p:ph type="ftr" idx="3"/>"#, "", ""));
        let style = resolve_style(&same_index, &[], &ancestry);
        assert_eq!(style.geometry, Some(Rect::new(7, 7, 7, 7)));
        assert_eq!(style.font_height(1).unwrap(), 1000);
    }

    #[test]
    fn test_non_placeholder_does_not_walk_the_chain() {
        let plain = parse(format!(
            r#"<p:sp {NS}><p:nvSpPr><p:cNvPr id="3" name="Box"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>"#
        ));
        let master = part(
            "sldMaster",
            &placeholder(
                r#"<p:ph type="body" idx="1"/>"#,
                XFRM,
                r#"<a:lvl1pPr><a:defRPr sz="2400"/></a:lvl1pPr>"#,
            ),
            "",
        );
        let ancestry = SlideAncestry::new(None, None, Some(&master));
        let style = resolve_style(&plain, &[], &ancestry);
        assert_eq!(style.geometry, None);
        assert_eq!(style.font_height(1).unwrap(), DEFAULT_FONT_HEIGHT);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let slide_shape = shape(placeholder(r#"<p:ph type="body" idx="1"/>"#, "", ""));
        let ancestry = SlideAncestry::default();
        assert!(matches!(
            font_height(&slide_shape, 0, &ancestry),
            Err(OoxmlError::InvalidParagraphLevel(0))
        ));
        assert!(matches!(
            font_height(&slide_shape, 10, &ancestry),
            Err(OoxmlError::InvalidParagraphLevel(10))
        ));
        let style = resolve_style(&slide_shape, &[], &ancestry);
        assert!(style.font_height(12).is_err());
    }

    #[test]
    fn test_run_size_and_paragraph_level() {
        let slide_shape = shape(placeholder(
            r#"<p:ph type="body" idx="1"/>"#,
            "",
            r#"<a:lvl2pPr><a:defRPr sz="2800"/></a:lvl2pPr>"#,
        ));
        let paragraph = parse(format!(r#"<a:p {NS}><a:pPr lvl="1"/><a:r><a:t>x</a:t></a:r></a:p>"#));
        let plain_run = parse(format!(r#"<a:r {NS}><a:t>x</a:t></a:r>"#));
        let sized_run = parse(format!(r#"<a:r {NS}><a:rPr sz="900"/><a:t>x</a:t></a:r>"#));
        let ancestry = SlideAncestry::default();

        assert_eq!(
            font_height_for_run(&slide_shape, &paragraph, &plain_run, &ancestry).unwrap(),
            2800
        );
        assert_eq!(
            font_height_for_run(&slide_shape, &paragraph, &sized_run, &ancestry).unwrap(),
            900
        );

        let too_deep = parse(format!(r#"<a:p {NS}><a:pPr lvl="9"/></a:p>"#));
        assert!(font_height_for_run(&slide_shape, &too_deep, &sized_run, &ancestry).is_err());

        let max_lvl = parse(format!(r#"<a:p {NS}><a:pPr lvl="4294967295"/></a:p>"#));
        assert!(matches!(
            font_height_for_run(&slide_shape, &max_lvl, &plain_run, &ancestry),
            Err(OoxmlError::InvalidParagraphLevel(u32::MAX))
        ));
    }

    #[test]
    fn test_fill_resolution() {
        let slide = part("sld", "", "");
        let master = parse(format!(
            r#"<p:sldMaster {NS}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="112233"/></a:solidFill></p:bgPr></p:bg><p:spTree/></p:cSld></p:sldMaster>"#
        ));
        let ancestry = SlideAncestry::new(Some(&slide), None, Some(&master));

        let bg_shape = parse(format!(
            r#"<p:sp {NS} useBgFill="1"><p:nvSpPr><p:cNvPr id="4" name="s"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill></p:spPr></p:sp>"#
        ));
        assert_eq!(
            resolve_style(&bg_shape, &[], &ancestry).fill,
            FillDescriptor::Solid {
                color: Some(Color::Rgb("112233".into()))
            }
        );

        let themed = parse(format!(
            r#"<p:sp {NS}><p:nvSpPr><p:cNvPr id="5" name="s"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:style><a:fillRef idx="1"><a:schemeClr val="accent1"/></a:fillRef></p:style></p:sp>"#
        ));
        assert_eq!(
            resolve_style(&themed, &[], &ancestry).fill,
            FillDescriptor::ThemeReference {
                index: 1,
                color: Some(Color::Scheme("accent1".into()))
            }
        );

        let bare = parse(format!(r#"<p:cxnSp {NS}><p:spPr/></p:cxnSp>"#));
        assert_eq!(resolve_style(&bare, &[], &ancestry).fill, FillDescriptor::NoFill);
    }
}
