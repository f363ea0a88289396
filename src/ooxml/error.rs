//! Error types for OOXML resolution.

use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
///
/// Missing styling data is never an error: the inheritance chain resolves it.
/// Only malformed caller input and unresolvable chart data surface here.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid relationship
    #[error("Invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Paragraph levels run 1..=9
    #[error("Paragraph level {0} is outside 1..=9")]
    InvalidParagraphLevel(u32),

    /// Range formula text that cannot be tokenized
    #[error("Malformed range formula '{formula}' at byte {position}: {reason}")]
    MalformedFormula {
        formula: String,
        position: usize,
        reason: String,
    },

    /// Worksheet named by a formula is absent from the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Referenced cell is absent from the worksheet
    #[error("Cell {cell} not found in sheet '{sheet}'")]
    CellNotFound { sheet: String, cell: String },

    /// Cell text that cannot be read as the requested value type
    #[error("Cell {cell} holds '{text}', which is not a number")]
    InvalidCellValue { cell: String, text: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for OoxmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
