//! pptx-resolve - semantic resolution for PowerPoint (.pptx) documents
//!
//! This library sits on top of a presentation's parsed part trees and answers
//! the questions a renderer or converter needs answered for every shape.
//!
//! # Features
//!
//! - **Shape classification**: auto shapes, pictures, audio, video, tables,
//!   charts (line, bar, pie, scatter, combo), SmartArt, OLE objects and groups
//! - **Placeholder inheritance**: effective geometry, font height per paragraph
//!   level and fill, resolved through slide → layout → master → defaults
//! - **Chart data**: series range formulas (`Sheet1!$B$2:$B$5`) resolved
//!   against the workbook embedded behind each chart, with a per-presentation
//!   workbook cache
//! - **Units**: EMU, point, inch, centimetre and pixel conversion
//!
//! # Example - Resolving a slide
//!
//! ```no_run
//! use pptx_resolve::ooxml::pptx::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pres = Package::open("presentation.pptx")?.presentation()?;
//!
//! for slide in pres.slides() {
//!     for shape in slide.classified() {
//!         let style = slide.resolve_style(shape.node);
//!         println!("{}: {:?}", shape.variant, style.geometry);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Parsing a range formula
//!
//! ```
//! use pptx_resolve::ooxml::xlsx::parse_range;
//!
//! let cells = parse_range("Sheet1!$B$1,$B$3:$B$4").unwrap();
//! let names: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
//! assert_eq!(names, ["B1", "B3", "B4"]);
//! ```

/// Unit conversion and the parsed element tree
pub mod common;

/// OOXML (Office Open XML) package access and presentation resolution
///
/// This module provides the OPC package layer, the presentation model with
/// shape classification and placeholder inheritance, chart series parsing,
/// and the embedded-workbook reader used for chart data.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::XmlElement;
pub use ooxml::error::{OoxmlError, Result};
pub use ooxml::pptx::{
    EffectiveStyle, Package, Presentation, Shape, ShapeVariant, Slide, SlideAncestry,
};
