//! Errors raised while reading the physical package and its relationship parts.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    /// The package file does not exist on disk.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// A part name that does not start with `/`, or a relative reference
    /// that escapes the package root.
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    /// No ZIP member backs the requested part name.
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// The source part has no relationship with the requested id.
    #[error("Relationship {r_id} not found in {source_part}")]
    RelationshipNotFound { source_part: String, r_id: String },

    /// A relationship exists but cannot be followed (e.g. it is external).
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("XML parsing error: {0}")]
    XmlError(String),

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),
}

impl From<quick_xml::Error> for OpcError {
    fn from(err: quick_xml::Error) -> Self {
        OpcError::XmlError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::XmlError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
