//! PowerPoint (.pptx) presentation support.
//!
//! Slides are loaded together with the layout and master they inherit from.
//! On top of that tree this module provides:
//!
//! - shape classification ([`shapes::classify`]): auto shapes, pictures,
//!   media, tables, charts, SmartArt, OLE objects and groups
//! - placeholder inheritance ([`style::resolve_style`]): geometry, per-level
//!   font heights and fill through slide → layout → master → defaults
//! - chart data ([`Presentation::series_values`]) read from the workbook
//!   embedded behind each chart, through a per-presentation cache
//!
//! # Example
//!
//! ```rust,no_run
//! use pptx_resolve::ooxml::pptx::Package;
//!
//! let package = Package::open("presentation.pptx")?;
//! let pres = package.presentation()?;
//!
//! for slide in pres.slides() {
//!     for shape in slide.shapes() {
//!         let style = slide.resolve_style(shape.element());
//!         println!("{}: {:?}, {} at level 1", shape.name(), style.geometry, style.font_height(1)?);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constants;
pub mod fill;
pub mod package;
pub mod placeholder;
pub mod presentation;
pub mod shapes;
pub mod slide;
pub mod style;

pub use fill::{Color, FillDescriptor, GradientStop};
pub use package::Package;
pub use placeholder::{PlaceholderKey, PlaceholderKind, PlaceholderRecord};
pub use presentation::Presentation;
pub use shapes::{ClassifiedShape, Rect, Shape, ShapeContext, ShapeId, ShapeVariant, classify};
pub use slide::{ChartPart, LoadedPart, Slide};
pub use style::{
    EffectiveStyle, FontSource, InheritanceChain, SlideAncestry, font_height, font_height_for_run,
    resolve_style,
};
