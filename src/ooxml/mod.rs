//! Office Open XML (OOXML) presentation resolution.
//!
//! # Architecture
//!
//! The module is organized into several layers:
//!
//! 1. **OPC Layer** (`opc`): ZIP package reading, part names, relationships
//! 2. **Error** (`error`): the error type shared by every layer
//! 3. **Format-Specific Modules**:
//!    - `pptx`: presentations, shape classification, placeholder inheritance
//!    - `charts`: chart kind detection and series references
//!    - `xlsx`: range formulas and the workbooks embedded behind charts
//!
//! # Example: Classifying shapes
//!
//! ```rust,no_run
//! use pptx_resolve::ooxml::pptx::Package;
//!
//! let pkg = Package::open("presentation.pptx")?;
//! let pres = pkg.presentation()?;
//!
//! if let Some(slide) = pres.slide(0) {
//!     for shape in slide.classified() {
//!         println!("{:?} is a {}", shape.id().map(|id| id.name), shape.variant);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod charts;
pub mod error;
pub mod opc;
pub mod pptx;
pub mod xlsx;

#[cfg(test)]
pub mod test_support;

pub use charts::{ChartKind, ChartSeries, ChartSeriesRef, Value, ValueKind};
pub use error::{OoxmlError, Result};
pub use opc::{OpcError, PackURI};
pub use pptx::{Package, Presentation, Slide};
pub use xlsx::{CellAddress, CellRange, SpreadsheetCache, parse_range, resolve};
