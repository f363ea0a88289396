//! Shapes on slides, layouts and masters.
//!
//! - [`classify`]: ordered classification rules
//! - [`geometry`]: EMU rectangles and group coordinate mapping
//! - [`base`]: the [`Shape`] wrapper with cached variant and style
pub mod base;
pub mod classify;
pub mod geometry;

pub use base::{Shape, ShapeId};
pub use classify::{
    ClassifiedShape, RULES, ShapeContext, ShapeVariant, Verdict, classify, classify_tree,
};
pub use geometry::{GroupStack, GroupTransform, Rect};
