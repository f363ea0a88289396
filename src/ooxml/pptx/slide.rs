//! Slides, their layout and master, and the chart parts they reference.

use crate::common::xml::XmlElement;
use crate::ooxml::charts::{ChartKind, ChartSeries, detect_chart_kind, parse_chart_series};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{PackURI, PhysPkgReader, Relationships};
use crate::ooxml::pptx::shapes::classify::{
    ClassifiedShape, ShapeContext, classify_tree, is_shape_node,
};
use crate::ooxml::pptx::shapes::{Shape, ShapeId};
use crate::ooxml::pptx::style::{EffectiveStyle, SlideAncestry, resolve_style};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A parsed XML part with its relationships.
#[derive(Debug, Clone)]
pub struct LoadedPart {
    pub part_name: PackURI,
    pub root: XmlElement,
    pub rels: Relationships,
}

impl LoadedPart {
    pub fn load(package: &PhysPkgReader, part_name: PackURI) -> Result<Self> {
        let root = XmlElement::parse(package.blob_for(&part_name)?)?;
        let rels = package.rels_for(&part_name)?;
        Ok(Self {
            part_name,
            root,
            rels,
        })
    }

    /// Part targeted by the first relationship of `reltype`, if any.
    fn related(&self, reltype: &str) -> Result<Option<PackURI>> {
        match self.rels.first_of_type(reltype) {
            Some(rel) => Ok(Some(self.rels.target_partname(rel.r_id())?)),
            None => Ok(None),
        }
    }
}

/// Parsed layouts and masters shared between the slides that use them.
pub(crate) type PartCache = HashMap<PackURI, Arc<LoadedPart>>;

fn load_shared(
    package: &PhysPkgReader,
    part_name: PackURI,
    cache: &mut PartCache,
) -> Result<Arc<LoadedPart>> {
    if let Some(part) = cache.get(&part_name) {
        return Ok(Arc::clone(part));
    }
    let part = Arc::new(LoadedPart::load(package, part_name.clone())?);
    cache.insert(part_name, Arc::clone(&part));
    Ok(part)
}

/// A chart part (`c:chartSpace`) and its relationships.
#[derive(Debug, Clone)]
pub struct ChartPart {
    part: LoadedPart,
}

impl ChartPart {
    #[inline]
    pub fn part_name(&self) -> &PackURI {
        &self.part.part_name
    }

    #[inline]
    pub fn chart_space(&self) -> &XmlElement {
        &self.part.root
    }

    pub fn kind(&self) -> ChartKind {
        detect_chart_kind(&self.part.root)
    }

    pub fn series(&self) -> Vec<ChartSeries> {
        parse_chart_series(&self.part.root)
    }

    /// Embedded workbook holding the chart data (`package` relationship).
    pub fn workbook_part(&self) -> Result<Option<PackURI>> {
        match self.part.rels.first_of_type(rt::PACKAGE) {
            Some(rel) if rel.is_external() => Err(OoxmlError::InvalidRelationship(format!(
                "chart data of {} is linked outside the package ({})",
                self.part.part_name,
                rel.target_ref()
            ))),
            Some(rel) => Ok(Some(self.part.rels.target_partname(rel.r_id())?)),
            None => Ok(None),
        }
    }
}

/// One slide with the layout and master it inherits from.
#[derive(Debug, Clone)]
pub struct Slide {
    package: Arc<PhysPkgReader>,
    part: LoadedPart,
    layout: Option<Arc<LoadedPart>>,
    master: Option<Arc<LoadedPart>>,
    default_text_style: Option<Arc<XmlElement>>,
}

impl Slide {
    pub(crate) fn load(
        package: Arc<PhysPkgReader>,
        part_name: PackURI,
        shared: &mut PartCache,
        default_text_style: Option<Arc<XmlElement>>,
    ) -> Result<Self> {
        let part = LoadedPart::load(&package, part_name)?;
        let layout = match part.related(rt::SLIDE_LAYOUT)? {
            Some(name) => Some(load_shared(&package, name, shared)?),
            None => None,
        };
        let master = match layout.as_deref().map(|l| l.related(rt::SLIDE_MASTER)) {
            Some(Ok(Some(name))) => Some(load_shared(&package, name, shared)?),
            Some(Err(e)) => return Err(e),
            _ => None,
        };
        Ok(Self {
            package,
            part,
            layout,
            master,
            default_text_style,
        })
    }

    #[inline]
    pub fn part_name(&self) -> &PackURI {
        &self.part.part_name
    }

    /// The `p:sld` element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.part.root
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.part.rels
    }

    pub fn layout(&self) -> Option<&XmlElement> {
        self.layout.as_deref().map(|l| &l.root)
    }

    pub fn master(&self) -> Option<&XmlElement> {
        self.master.as_deref().map(|m| &m.root)
    }

    pub fn ancestry(&self) -> SlideAncestry<'_> {
        SlideAncestry::new(Some(self.root()), self.layout(), self.master())
            .with_default_text_style(self.default_text_style.as_deref())
    }

    /// `p:cSld/p:spTree`.
    pub fn shape_tree(&self) -> Option<&XmlElement> {
        self.part.root.find_path(&["cSld", "spTree"])
    }

    fn shape_nodes(&self) -> impl Iterator<Item = &XmlElement> {
        self.shape_tree()
            .into_iter()
            .flat_map(|tree| tree.children().iter())
            .filter(|c| is_shape_node(c))
    }

    /// Top-level shapes as owned wrappers.
    pub fn shapes(&self) -> Vec<Shape> {
        self.shape_nodes().map(|n| Shape::new(n.clone())).collect()
    }

    /// Top-level shapes classified, groups with their classified children.
    /// Unrenderable pictures are left out.
    pub fn classified(&self) -> Vec<ClassifiedShape<'_>> {
        self.shape_nodes()
            .filter_map(|n| classify_tree(n, self))
            .collect()
    }

    /// First top-level shape with the given id.
    pub fn shape_by_id(&self, id: u32) -> Option<&XmlElement> {
        self.shape_nodes()
            .find(|n| ShapeId::from_element(n).is_some_and(|s| s.id == id))
    }

    /// Effective style of a top-level shape node of this slide.
    pub fn resolve_style(&self, shape: &XmlElement) -> EffectiveStyle {
        resolve_style(shape, &[], &self.ancestry())
    }

    /// Chart part referenced by a graphic frame (`c:chart@r:id`).
    ///
    /// `Ok(None)` when the frame holds no chart reference.
    pub fn chart(&self, frame: &XmlElement) -> Result<Option<ChartPart>> {
        let Some(r_id) = frame
            .find_path(&["graphic", "graphicData", "chart"])
            .and_then(|c| c.attr("id"))
        else {
            return Ok(None);
        };
        if !self.part.rels.has_of_type(r_id, rt::CHART) {
            return Err(OoxmlError::InvalidRelationship(format!(
                "{} in {} is not a chart relationship",
                r_id, self.part.part_name
            )));
        }
        let part_name = self.part.rels.target_partname(r_id)?;
        Ok(Some(ChartPart {
            part: LoadedPart::load(&self.package, part_name)?,
        }))
    }
}

impl ShapeContext for Slide {
    fn resolves_image(&self, r_id: &str) -> bool {
        self.part.rels.has_of_type(r_id, rt::IMAGE)
            && self
                .part
                .rels
                .target_partname(r_id)
                .is_ok_and(|name| self.package.contains(&name))
    }

    fn load_chart(&self, r_id: &str) -> Option<XmlElement> {
        if !self.part.rels.has_of_type(r_id, rt::CHART) {
            return None;
        }
        let loaded = self
            .part
            .rels
            .target_partname(r_id)
            .map_err(OoxmlError::from)
            .and_then(|name| LoadedPart::load(&self.package, name));
        match loaded {
            Ok(part) => Some(part.root),
            Err(e) => {
                warn!(r_id, error = %e, "chart part could not be loaded");
                None
            },
        }
    }
}
