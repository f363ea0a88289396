//! Common types and utilities shared across the package readers.
//!
//! Unit conversion and the parsed element tree live here; everything
//! format-specific lives under [`crate::ooxml`].

// Submodule declarations
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use xml::XmlElement;
