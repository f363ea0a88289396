//! Shape geometry in EMUs and group coordinate mapping.

use crate::common::unit::emu_to_pt;
use crate::common::xml::XmlElement;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Position and size of a shape, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Same rectangle in points, as `(x, y, w, h)`.
    pub fn to_points(&self) -> (f64, f64, f64, f64) {
        (
            emu_to_pt(self.x),
            emu_to_pt(self.y),
            emu_to_pt(self.w),
            emu_to_pt(self.h),
        )
    }

    /// Read `a:off` and `a:ext` from an `xfrm` element. Both must be present.
    pub fn from_xfrm(xfrm: &XmlElement) -> Option<Self> {
        let off = xfrm.child("off")?;
        let ext = xfrm.child("ext")?;
        Some(Self {
            x: off.attr_parse("x")?,
            y: off.attr_parse("y")?,
            w: ext.attr_parse("cx")?,
            h: ext.attr_parse("cy")?,
        })
    }
}

/// The `xfrm` element a shape node carries for its own placement.
///
/// Graphic frames hold `p:xfrm` directly; groups use `p:grpSpPr/a:xfrm`;
/// everything else uses `p:spPr/a:xfrm`.
pub fn transform_element(shape: &XmlElement) -> Option<&XmlElement> {
    match shape.local_name() {
        "graphicFrame" => shape.child("xfrm"),
        "grpSp" => shape.find_path(&["grpSpPr", "xfrm"]),
        _ => shape.find_path(&["spPr", "xfrm"]),
    }
}

/// A shape's own explicit geometry, in the coordinate space of its parent.
pub fn own_transform(shape: &XmlElement) -> Option<Rect> {
    transform_element(shape).and_then(Rect::from_xfrm)
}

/// Child coordinate space of a group (`p:grpSpPr/a:xfrm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupTransform {
    pub off: (i64, i64),
    pub ext: (i64, i64),
    pub ch_off: (i64, i64),
    pub ch_ext: (i64, i64),
}

impl GroupTransform {
    /// Transform of a `p:grpSp`. A group without `a:chOff` maps its
    /// children at their stated coordinates plus the group offset.
    pub fn from_group(group: &XmlElement) -> Option<Self> {
        let xfrm = group.find_path(&["grpSpPr", "xfrm"])?;
        let pair = |local: &str, a: &str, b: &str| -> Option<(i64, i64)> {
            let e = xfrm.child(local)?;
            Some((e.attr_parse(a)?, e.attr_parse(b)?))
        };
        let off = pair("off", "x", "y").unwrap_or_default();
        let ext = pair("ext", "cx", "cy").unwrap_or_default();
        Some(Self {
            off,
            ext,
            ch_off: pair("chOff", "x", "y").unwrap_or_default(),
            ch_ext: pair("chExt", "cx", "cy").unwrap_or(ext),
        })
    }

    /// Map a rectangle from this group's child space into its parent's space.
    ///
    /// Only offsets are translated; extents pass through unscaled.
    pub fn apply(&self, local: Rect) -> Rect {
        Rect {
            x: local.x - self.ch_off.0 + self.off.0,
            y: local.y - self.ch_off.1 + self.off.1,
            w: local.w,
            h: local.h,
        }
    }
}

/// Enclosing group transforms, innermost first.
pub type GroupStack = SmallVec<[GroupTransform; 4]>;

/// Map a local rectangle to slide coordinates through every enclosing
/// group, innermost first.
pub fn to_absolute(local: Rect, groups: &[GroupTransform]) -> Rect {
    groups.iter().fold(local, |rect, group| group.apply(rect))
}
