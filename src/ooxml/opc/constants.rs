//! Constant values related to the Open Packaging Convention.
//!
//! Content types identify the presentation main part and the embedded workbook
//! main part; relationship types drive slide → layout → master navigation and
//! chart → workbook lookup.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // PresentationML main parts
    pub const PML_PRESENTATION_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const PML_PRES_MACRO_MAIN: &str =
        "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";
    pub const PML_TEMPLATE_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";
    pub const PML_SLIDESHOW_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml";

    // SpreadsheetML main parts
    pub const SML_SHEET_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const SML_SHEET_MACRO_MAIN: &str = "application/vnd.ms-excel.sheet.macroEnabled.main+xml";

    /// Every main-part content type accepted as a presentation.
    pub const PRESENTATION_MAIN_TYPES: [&str; 4] = [
        PML_PRESENTATION_MAIN,
        PML_PRES_MACRO_MAIN,
        PML_TEMPLATE_MAIN,
        PML_SLIDESHOW_MAIN,
    ];
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., linked images or workbooks)
    pub const EXTERNAL: &str = "External";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    // Presentation structure
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    // Shape content
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const CHART: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/chart";

    // Embedded chart data
    pub const PACKAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/package";
    pub const OLE_OBJECT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/oleObject";

    // Workbook structure
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

    /// Compare two relationship types by their final segment, so the strict
    /// (`http://purl.oclc.org/ooxml/...`) and transitional namespaces match.
    pub fn matches(actual: &str, expected: &str) -> bool {
        if actual == expected {
            return true;
        }
        match (actual.rsplit_once('/'), expected.rsplit_once('/')) {
            (Some((_, a)), Some((_, b))) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::relationship_type;

    #[test]
    fn test_strict_relationship_types_match() {
        assert!(relationship_type::matches(
            "http://purl.oclc.org/ooxml/officeDocument/relationships/slideLayout",
            relationship_type::SLIDE_LAYOUT
        ));
        assert!(!relationship_type::matches(
            relationship_type::SLIDE_MASTER,
            relationship_type::SLIDE_LAYOUT
        ));
    }
}
