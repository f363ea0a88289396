//! Embedded workbook access for chart data.
//!
//! Charts keep their source data in a small `.xlsx` package embedded next to
//! the chart part. This module parses the range formulas that point into it,
//! reads the workbook, and turns series references into literal values.

pub mod cell;
pub mod range;
pub mod resolver;
pub mod shared_strings;
pub mod workbook;

pub use cell::CellAddress;
pub use range::{CellRange, parse_range, parse_range_formula};
pub use resolver::{EmbeddedPackageHandle, SpreadsheetCache, resolve};
pub use shared_strings::SharedStrings;
pub use workbook::{EmbeddedWorkbook, Worksheet};
