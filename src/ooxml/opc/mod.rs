//! Open Packaging Conventions (OPC) reading.
//!
//! This module covers the parts of the OPC specification the resolution layer
//! needs:
//!
//! - Part names and relative reference resolution
//! - Relationship parts
//! - Content types
//! - ZIP-based physical packaging (both the presentation and embedded workbooks)

pub mod constants;
pub mod error;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use error::OpcError;
pub use packuri::PackURI;
pub use phys_pkg::PhysPkgReader;
pub use rel::{Relationship, Relationships};
