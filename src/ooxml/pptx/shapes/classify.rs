//! Shape classification.
//!
//! A shape tree node is tested against [`RULES`] in order and the first rule
//! that decides wins. A rule either passes the node on, claims it with a
//! variant, or rejects it as unrenderable (the node is then treated as absent).

use crate::common::xml::XmlElement;
use crate::ooxml::charts::{ChartKind, detect_chart_kind};
use crate::ooxml::pptx::constants::{AUDIO_MARKERS, SHAPE_NODES, VIDEO_MARKERS, graphic_data_uri};
use crate::ooxml::pptx::shapes::base::ShapeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

/// Concrete kind of a shape tree node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeVariant {
    AutoShape,
    Picture,
    Audio,
    Video,
    OleObject,
    Table,
    Chart(ChartKind),
    Group,
    SmartArt,
}

impl ShapeVariant {
    #[inline]
    pub fn is_chart(&self) -> bool {
        matches!(self, ShapeVariant::Chart(_))
    }
}

impl fmt::Display for ShapeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeVariant::AutoShape => f.write_str("auto shape"),
            ShapeVariant::Picture => f.write_str("picture"),
            ShapeVariant::Audio => f.write_str("audio"),
            ShapeVariant::Video => f.write_str("video"),
            ShapeVariant::OleObject => f.write_str("OLE object"),
            ShapeVariant::Table => f.write_str("table"),
            ShapeVariant::Chart(kind) => write!(f, "{} chart", kind),
            ShapeVariant::Group => f.write_str("group"),
            ShapeVariant::SmartArt => f.write_str("SmartArt"),
        }
    }
}

/// Package access needed while classifying.
pub trait ShapeContext {
    /// Whether `r_id` names an image relationship of the containing part.
    fn resolves_image(&self, r_id: &str) -> bool;

    /// Load the chart part (`c:chartSpace`) referenced by `r_id`.
    fn load_chart(&self, _r_id: &str) -> Option<XmlElement> {
        None
    }
}

/// Outcome of one classification rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Not this rule's business
    Pass,
    Match(ShapeVariant),
    /// Unrenderable; the node is treated as absent
    Skip,
}

pub type Rule = fn(&XmlElement, &dyn ShapeContext) -> Verdict;

/// Classification rules in priority order.
pub const RULES: [(&str, Rule); 9] = [
    ("audio", audio),
    ("video", video),
    ("picture", picture),
    ("chart", chart),
    ("table", table),
    ("smart_art", smart_art),
    ("ole_object", ole_object),
    ("group", group),
    ("auto_shape", auto_shape),
];

/// Classify a shape tree node. `None` means the node is an unrenderable
/// picture and should be treated as absent.
pub fn classify(node: &XmlElement, ctx: &dyn ShapeContext) -> Option<ShapeVariant> {
    for (name, rule) in RULES {
        match rule(node, ctx) {
            Verdict::Pass => continue,
            Verdict::Match(variant) => {
                trace!(rule = name, %variant, node = node.name(), "classified shape");
                return Some(variant);
            },
            Verdict::Skip => return None,
        }
    }
    Some(ShapeVariant::AutoShape)
}

fn media_markers(node: &XmlElement) -> Option<&XmlElement> {
    if node.is("pic") {
        node.find_path(&["nvPicPr", "nvPr"])
    } else {
        None
    }
}

fn audio(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    match media_markers(node) {
        Some(nv) if AUDIO_MARKERS.iter().any(|m| nv.child(m).is_some()) => {
            Verdict::Match(ShapeVariant::Audio)
        },
        _ => Verdict::Pass,
    }
}

fn video(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    match media_markers(node) {
        Some(nv) if VIDEO_MARKERS.iter().any(|m| nv.child(m).is_some()) => {
            Verdict::Match(ShapeVariant::Video)
        },
        _ => Verdict::Pass,
    }
}

fn picture(node: &XmlElement, ctx: &dyn ShapeContext) -> Verdict {
    // Groups and frames hold pictures as children, classified on their own
    let pic = if node.is("pic") {
        Some(node)
    } else if node.is("grpSp") || node.is("graphicFrame") {
        None
    } else {
        node.find("pic")
    };
    let Some(pic) = pic else {
        return Verdict::Pass;
    };

    let r_id = pic
        .find_path(&["blipFill", "blip"])
        .and_then(|blip| blip.attr("embed"));
    match r_id {
        Some(r_id) if ctx.resolves_image(r_id) => Verdict::Match(ShapeVariant::Picture),
        _ => {
            warn!(r_id = ?r_id, "skipping picture without a resolvable image");
            Verdict::Skip
        },
    }
}

fn graphic_data(node: &XmlElement) -> Option<&XmlElement> {
    if node.is("graphicFrame") {
        node.find_path(&["graphic", "graphicData"])
    } else {
        None
    }
}

fn chart(node: &XmlElement, ctx: &dyn ShapeContext) -> Verdict {
    let Some(data) = graphic_data(node) else {
        return Verdict::Pass;
    };
    if !data.attr("uri").is_some_and(graphic_data_uri::is_chart) {
        return Verdict::Pass;
    }

    let loaded = data
        .child("chart")
        .and_then(|c| c.attr("id"))
        .and_then(|r_id| ctx.load_chart(r_id));
    let kind = match &loaded {
        Some(chart_space) => detect_chart_kind(chart_space),
        None => detect_chart_kind(node),
    };
    Verdict::Match(ShapeVariant::Chart(kind))
}

fn table(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    match graphic_data(node) {
        Some(data) if data.find("tbl").is_some() || data.child("tbl").is_some() => {
            Verdict::Match(ShapeVariant::Table)
        },
        _ => Verdict::Pass,
    }
}

fn smart_art(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    match graphic_data(node).and_then(|data| data.attr("uri")) {
        Some(graphic_data_uri::DIAGRAM) => Verdict::Match(ShapeVariant::SmartArt),
        _ => Verdict::Pass,
    }
}

fn ole_object(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    if node.is("graphicFrame") {
        Verdict::Match(ShapeVariant::OleObject)
    } else {
        Verdict::Pass
    }
}

fn group(node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    if node.is("grpSp") {
        Verdict::Match(ShapeVariant::Group)
    } else {
        Verdict::Pass
    }
}

fn auto_shape(_node: &XmlElement, _ctx: &dyn ShapeContext) -> Verdict {
    Verdict::Match(ShapeVariant::AutoShape)
}

/// Whether `node` is an element that can appear in a shape tree.
#[inline]
pub fn is_shape_node(node: &XmlElement) -> bool {
    SHAPE_NODES.contains(&node.local_name())
}

/// A classified node and, for groups, its classified children.
#[derive(Debug, Clone)]
pub struct ClassifiedShape<'a> {
    pub node: &'a XmlElement,
    pub variant: ShapeVariant,
    pub children: Vec<ClassifiedShape<'a>>,
}

impl<'a> ClassifiedShape<'a> {
    pub fn id(&self) -> Option<ShapeId> {
        ShapeId::from_element(self.node)
    }

    /// This shape and every nested shape, depth first.
    pub fn flatten(&self) -> Vec<&ClassifiedShape<'a>> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// Classify a node and, if it is a group, its children recursively.
/// Unrenderable nodes are dropped.
pub fn classify_tree<'a>(node: &'a XmlElement, ctx: &dyn ShapeContext) -> Option<ClassifiedShape<'a>> {
    let variant = classify(node, ctx)?;
    let children = if variant == ShapeVariant::Group {
        node.children()
            .iter()
            .filter(|c| is_shape_node(c))
            .filter_map(|c| classify_tree(c, ctx))
            .collect()
    } else {
        Vec::new()
    };
    Some(ClassifiedShape {
        node,
        variant,
        children,
    })
}
