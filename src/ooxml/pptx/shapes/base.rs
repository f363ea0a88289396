//! Shape wrapper with cached classification and style.
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::placeholder::PlaceholderKey;
use crate::ooxml::pptx::shapes::classify::{ShapeContext, ShapeVariant, classify, is_shape_node};
use crate::ooxml::pptx::shapes::geometry::{GroupStack, GroupTransform, Rect};
use crate::ooxml::pptx::style::{EffectiveStyle, SlideAncestry, resolve_style};
use serde::{Deserialize, Serialize};

/// Fill elements that may appear in a shape's properties.
const FILL_ELEMENTS: [&str; 6] = [
    "noFill",
    "solidFill",
    "gradFill",
    "blipFill",
    "pattFill",
    "grpFill",
];

/// Identity of a shape, from its non-visual drawing properties (`p:cNvPr`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId {
    pub id: u32,
    pub name: String,
    pub hidden: bool,
}

impl ShapeId {
    /// Read the first `cNvPr` below `node`. For groups this is the group's
    /// own block, which precedes those of its children.
    pub fn from_element(node: &XmlElement) -> Option<Self> {
        let c_nv_pr = node.find("cNvPr")?;
        Some(Self {
            id: c_nv_pr.attr_parse("id")?,
            name: c_nv_pr.attr("name").unwrap_or_default().to_string(),
            hidden: c_nv_pr.attr_bool("hidden").unwrap_or(false),
        })
    }
}

/// A shape tree node together with its derived projections.
///
/// The variant and the effective style are computed on first access and
/// kept until the next mutating call; every mutator bumps [`Shape::version`].
/// Layout and master edits are not tracked: call [`Shape::invalidate`] after
/// changing them.
#[derive(Debug, Clone)]
pub struct Shape {
    element: XmlElement,
    /// Transforms of enclosing groups, innermost first
    groups: GroupStack,
    version: u64,
    variant_cache: Option<(u64, Option<ShapeVariant>)>,
    style_cache: Option<(u64, EffectiveStyle)>,
}

impl Shape {
    pub fn new(element: XmlElement) -> Self {
        Self::with_groups(element, GroupStack::new())
    }

    pub fn with_groups(element: XmlElement, groups: GroupStack) -> Self {
        Self {
            element,
            groups,
            version: 0,
            variant_cache: None,
            style_cache: None,
        }
    }

    #[inline]
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    pub fn into_element(self) -> XmlElement {
        self.element
    }

    #[inline]
    pub fn groups(&self) -> &[GroupTransform] {
        &self.groups
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn id(&self) -> Option<ShapeId> {
        ShapeId::from_element(&self.element)
    }

    pub fn name(&self) -> &str {
        self.element
            .find("cNvPr")
            .and_then(|c| c.attr("name"))
            .unwrap_or_default()
    }

    pub fn placeholder_key(&self) -> Option<PlaceholderKey> {
        PlaceholderKey::from_shape(&self.element)
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder_key().is_some()
    }

    /// Classified variant; `None` for unrenderable pictures.
    pub fn variant(&mut self, ctx: &dyn ShapeContext) -> Option<ShapeVariant> {
        let version = self.version;
        let (_, variant) = match self.variant_cache.take() {
            Some(entry) if entry.0 == version => self.variant_cache.insert(entry),
            _ => self
                .variant_cache
                .insert((version, classify(&self.element, ctx))),
        };
        variant.clone()
    }

    /// Effective geometry, font heights and fill.
    pub fn effective_style(&mut self, ancestry: &SlideAncestry<'_>) -> &EffectiveStyle {
        let version = self.version;
        let (_, style) = match self.style_cache.take() {
            Some(entry) if entry.0 == version => self.style_cache.insert(entry),
            _ => self.style_cache.insert((
                version,
                resolve_style(&self.element, &self.groups, ancestry),
            )),
        };
        style
    }

    /// Drop cached projections without touching the element.
    pub fn invalidate(&mut self) {
        self.variant_cache = None;
        self.style_cache = None;
    }

    fn touch(&mut self) {
        self.version += 1;
        self.invalidate();
    }

    /// Text of the shape's text body, one line per paragraph.
    pub fn text(&self) -> String {
        let Some(body) = self.element.child("txBody") else {
            return String::new();
        };
        body.children_named("p")
            .map(|p| {
                p.descendants()
                    .filter(|e| e.is("t"))
                    .map(XmlElement::text)
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Shapes nested in a group, each carrying this group's transform.
    pub fn children(&self) -> Vec<Shape> {
        if !self.element.is("grpSp") {
            return Vec::new();
        }
        let mut groups = GroupStack::new();
        groups.extend(GroupTransform::from_group(&self.element));
        groups.extend(self.groups.iter().copied());

        self.element
            .children()
            .iter()
            .filter(|c| is_shape_node(c))
            .map(|c| Shape::with_groups(c.clone(), groups.clone()))
            .collect()
    }

    /// Replace the text body's paragraphs with one paragraph per line.
    ///
    /// The first run's properties are kept on every new run.
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        if !self.element.is("sp") {
            return Err(OoxmlError::InvalidFormat(format!(
                "{} has no text body",
                self.element.name()
            )));
        }
        if self.element.child("txBody").is_none() {
            self.element.push_child(
                XmlElement::new("p:txBody")
                    .with_child(XmlElement::new("a:bodyPr"))
                    .with_child(XmlElement::new("a:lstStyle")),
            );
        }
        let Some(body) = self.element.child_mut("txBody") else {
            return Err(OoxmlError::InvalidFormat("missing text body".to_string()));
        };

        let run_props = body.find("rPr").cloned();
        body.remove_children("p");
        for line in text.split('\n') {
            let mut run = XmlElement::new("a:r");
            if let Some(props) = &run_props {
                run.push_child(props.clone());
            }
            let mut t = XmlElement::new("a:t");
            t.set_text(line);
            run.push_child(t);
            body.push_child(XmlElement::new("a:p").with_child(run));
        }
        self.touch();
        Ok(())
    }

    /// Set an explicit solid fill from a six-digit hex color (`#` optional).
    pub fn set_solid_fill(&mut self, hex: &str) -> Result<()> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(OoxmlError::InvalidFormat(format!("invalid RGB color: {}", hex)));
        }
        let properties = properties_mut(&mut self.element)?;
        for fill in FILL_ELEMENTS {
            properties.remove_children(fill);
        }
        let position = properties
            .children()
            .iter()
            .rposition(|c| c.is("xfrm") || c.is("prstGeom") || c.is("custGeom"))
            .map_or(0, |i| i + 1);
        properties.insert_child(
            position,
            XmlElement::new("a:solidFill").with_child(
                XmlElement::new("a:srgbClr").with_attr("val", hex.to_ascii_uppercase()),
            ),
        );
        self.element.remove_attr("useBgFill");
        self.touch();
        Ok(())
    }

    /// Set the shape's own offset and extents, in its parent's coordinates.
    pub fn set_position(&mut self, rect: Rect) -> Result<()> {
        let xfrm = if self.element.is("graphicFrame") {
            if self.element.child("xfrm").is_none() {
                let at = self
                    .element
                    .children()
                    .iter()
                    .position(|c| c.is("graphic"))
                    .unwrap_or(self.element.children().len());
                self.element.insert_child(at, XmlElement::new("p:xfrm"));
            }
            self.element.child_mut("xfrm")
        } else {
            let properties = properties_mut(&mut self.element)?;
            if properties.child("xfrm").is_none() {
                properties.insert_child(0, XmlElement::new("a:xfrm"));
            }
            properties.child_mut("xfrm")
        };
        let Some(xfrm) = xfrm else {
            return Err(OoxmlError::InvalidFormat("missing transform".to_string()));
        };

        set_pair(xfrm, "a:off", ("x", rect.x), ("y", rect.y));
        set_pair(xfrm, "a:ext", ("cx", rect.w), ("cy", rect.h));
        self.touch();
        Ok(())
    }
}

/// The properties element holding fill and transform (`spPr` or `grpSpPr`).
fn properties_mut(shape: &mut XmlElement) -> Result<&mut XmlElement> {
    let local = if shape.is("grpSp") { "grpSpPr" } else { "spPr" };
    let name = shape.name().to_string();
    shape
        .child_mut(local)
        .ok_or_else(|| OoxmlError::InvalidFormat(format!("{} has no {}", name, local)))
}

fn set_pair(xfrm: &mut XmlElement, name: &str, a: (&str, i64), b: (&str, i64)) {
    let local = name.rsplit_once(':').map_or(name, |(_, l)| l);
    let element = match xfrm.children().iter().position(|c| c.is(local)) {
        Some(i) => &mut xfrm.children_mut()[i],
        None => {
            // off precedes ext
            let at = if local == "off" { 0 } else { xfrm.children().len() };
            xfrm.insert_child(at, XmlElement::new(name));
            &mut xfrm.children_mut()[at]
        },
    };
    element.set_attr(a.0, a.1.to_string());
    element.set_attr(b.0, b.1.to_string());
}
