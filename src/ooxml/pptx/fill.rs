//! Fill descriptors for shapes and slide backgrounds.
//!
//! A fill is read from the first DrawingML fill element under a properties
//! node (`p:spPr`, `p:bgPr`, ...). Theme-indexed fills (`a:fillRef`,
//! `p:bgRef`) are kept as references; the theme itself is not resolved.

use crate::common::xml::XmlElement;
use serde::{Deserialize, Serialize};

/// A DrawingML color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// `a:srgbClr@val`, uppercase hex without `#`
    Rgb(String),
    /// `a:schemeClr@val`, e.g. `accent1`
    Scheme(String),
    /// `a:sysClr`: the last computed color when present, else the system name
    System(String),
    /// `a:prstClr@val`
    Preset(String),
}

impl Color {
    /// Read a color element itself (`a:srgbClr`, `a:schemeClr`, ...).
    pub fn from_element(element: &XmlElement) -> Option<Self> {
        let val = element.attr("val");
        match element.local_name() {
            "srgbClr" => val.map(|v| Color::Rgb(v.to_ascii_uppercase())),
            "schemeClr" => val.map(|v| Color::Scheme(v.to_string())),
            "sysClr" => element
                .attr("lastClr")
                .map(|v| Color::System(v.to_ascii_uppercase()))
                .or_else(|| val.map(|v| Color::System(v.to_string()))),
            "prstClr" => val.map(|v| Color::Preset(v.to_string())),
            _ => None,
        }
    }

    /// First color child of `parent`.
    pub fn first_in(parent: &XmlElement) -> Option<Self> {
        parent.children().iter().find_map(Color::from_element)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position from 0.0 to 1.0
    pub position: f64,
    pub color: Option<Color>,
}

/// The fill a shape or background ends up with.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FillDescriptor {
    #[default]
    NoFill,
    Solid {
        color: Option<Color>,
    },
    Gradient {
        stops: Vec<GradientStop>,
    },
    Picture {
        r_id: Option<String>,
    },
    Pattern {
        preset: Option<String>,
        foreground: Option<Color>,
        background: Option<Color>,
    },
    /// Inherit the enclosing group's fill (`a:grpFill`)
    Group,
    /// Fill taken from the theme's fill style list
    ThemeReference {
        index: u32,
        color: Option<Color>,
    },
}

impl FillDescriptor {
    /// Read a single fill element (`a:solidFill`, `a:gradFill`, ...).
    pub fn from_fill_element(fill: &XmlElement) -> Option<Self> {
        let descriptor = match fill.local_name() {
            "noFill" => FillDescriptor::NoFill,
            "solidFill" => FillDescriptor::Solid {
                color: Color::first_in(fill),
            },
            "gradFill" => FillDescriptor::Gradient {
                stops: fill
                    .child("gsLst")
                    .map(|list| {
                        list.children_named("gs")
                            .map(|gs| GradientStop {
                                position: gs.attr_parse::<f64>("pos").unwrap_or(0.0) / 100_000.0,
                                color: Color::first_in(gs),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "blipFill" => FillDescriptor::Picture {
                r_id: fill
                    .child("blip")
                    .and_then(|b| b.attr("embed"))
                    .map(str::to_string),
            },
            "pattFill" => FillDescriptor::Pattern {
                preset: fill.attr("prst").map(str::to_string),
                foreground: fill.child("fgClr").and_then(Color::first_in),
                background: fill.child("bgClr").and_then(Color::first_in),
            },
            "grpFill" => FillDescriptor::Group,
            _ => return None,
        };
        Some(descriptor)
    }

    /// First fill element among the children of a properties node.
    pub fn from_properties(properties: &XmlElement) -> Option<Self> {
        properties
            .children()
            .iter()
            .find_map(FillDescriptor::from_fill_element)
    }

    /// Theme reference from `a:fillRef` or `p:bgRef`. Index 0 means no fill.
    pub fn from_reference(reference: &XmlElement) -> Option<Self> {
        let index: u32 = reference.attr_parse("idx")?;
        if index == 0 {
            return Some(FillDescriptor::NoFill);
        }
        Some(FillDescriptor::ThemeReference {
            index,
            color: Color::first_in(reference),
        })
    }

    #[inline]
    pub fn is_no_fill(&self) -> bool {
        matches!(self, FillDescriptor::NoFill)
    }
}

/// The background fill declared by one part (`p:cSld/p:bg`), if any.
pub fn part_background(part_root: &XmlElement) -> Option<FillDescriptor> {
    let bg = part_root.find_path(&["cSld", "bg"])?;
    if let Some(properties) = bg.child("bgPr") {
        return FillDescriptor::from_properties(properties);
    }
    bg.child("bgRef").and_then(FillDescriptor::from_reference)
}

/// Background fill for a slide: the first part along slide, layout and
/// master that declares one. `NoFill` if none does.
pub fn background_fill<'a>(parts: impl IntoIterator<Item = &'a XmlElement>) -> FillDescriptor {
    parts
        .into_iter()
        .find_map(part_background)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> XmlElement {
        XmlElement::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_fill_kinds() {
        let solid = parse(r#"<p:spPr xmlns:a="urn:a" xmlns:p="urn:p"><a:xfrm/><a:solidFill><a:srgbClr val="ff0000"/></a:solidFill></p:spPr>"#);
        assert_eq!(
            FillDescriptor::from_properties(&solid),
            Some(FillDescriptor::Solid {
                color: Some(Color::Rgb("FF0000".into()))
            })
        );

        let gradient = parse(
            r#"<p:spPr xmlns:a="urn:a" xmlns:p="urn:p"><a:gradFill><a:gsLst>
<a:gs pos="0"><a:schemeClr val="accent1"/></a:gs><a:gs pos="100000"><a:sysClr val="window" lastClr="FFFFFF"/></a:gs>
</a:gsLst></a:gradFill></p:spPr>"#,
        );
        let Some(FillDescriptor::Gradient { stops }) = FillDescriptor::from_properties(&gradient) else {
            panic!("expected a gradient");
        };
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].position, 1.0);
        assert_eq!(stops[1].color, Some(Color::System("FFFFFF".into())));

        let pattern = parse(
            r#"<p:spPr xmlns:a="urn:a" xmlns:p="urn:p"><a:pattFill prst="dkDnDiag"><a:fgClr><a:prstClr val="black"/></a:fgClr></a:pattFill></p:spPr>"#,
        );
        assert_eq!(
            FillDescriptor::from_properties(&pattern),
            Some(FillDescriptor::Pattern {
                preset: Some("dkDnDiag".into()),
                foreground: Some(Color::Preset("black".into())),
                background: None,
            })
        );

        let none = parse(r#"<p:spPr xmlns:p="urn:p"><a:ln xmlns:a="urn:a"/></p:spPr>"#);
        assert_eq!(FillDescriptor::from_properties(&none), None);
    }

    #[test]
    fn test_background_walks_parts_in_order() {
        let slide = parse(r#"<p:sld xmlns:p="urn:p"><p:cSld><p:spTree/></p:cSld></p:sld>"#);
        let layout = parse(
            r#"<p:sldLayout xmlns:p="urn:p" xmlns:a="urn:a"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg></p:cSld></p:sldLayout>"#,
        );
        let master = parse(
            r#"<p:sldMaster xmlns:p="urn:p" xmlns:a="urn:a"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="000000"/></a:solidFill></p:bgPr></p:bg></p:cSld></p:sldMaster>"#,
        );

        assert_eq!(
            background_fill([&slide, &layout, &master]),
            FillDescriptor::ThemeReference {
                index: 1001,
                color: Some(Color::Scheme("bg1".into()))
            }
        );
        assert!(matches!(
            background_fill([&slide, &master]),
            FillDescriptor::Solid { .. }
        ));
        assert_eq!(background_fill([&slide]), FillDescriptor::NoFill);
    }
}
