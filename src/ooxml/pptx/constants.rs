//! Fixed values used while resolving presentation shapes.
//!
//! There is no runtime configuration: fallback order and bounds are part of
//! the resolution contract.

/// Font height used when nothing in the inheritance chain defines one,
/// in hundredths of a point (18pt).
pub const DEFAULT_FONT_HEIGHT: u32 = 1800;

/// First paragraph level (`a:lvl1pPr`).
pub const MIN_PARAGRAPH_LEVEL: u32 = 1;

/// Last paragraph level (`a:lvl9pPr`).
pub const MAX_PARAGRAPH_LEVEL: u32 = 9;

/// `a:graphicData@uri` values identifying graphic frame content.
pub mod graphic_data_uri {
    pub const CHART: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
    pub const CHART_EX: &str = "http://schemas.microsoft.com/office/drawing/2014/chartex";
    pub const TABLE: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";
    pub const DIAGRAM: &str = "http://schemas.openxmlformats.org/drawingml/2006/diagram";
    pub const OLE: &str = "http://schemas.openxmlformats.org/presentationml/2006/ole";

    /// Whether `uri` marks chart content (classic or extended charts).
    pub fn is_chart(uri: &str) -> bool {
        uri == CHART || uri == CHART_EX
    }
}

/// Media markers inside a picture's non-visual properties (`p:nvPr`).
pub const AUDIO_MARKERS: [&str; 3] = ["audioFile", "wavAudioFile", "audioCd"];
pub const VIDEO_MARKERS: [&str; 2] = ["videoFile", "quickTimeFile"];

/// Element names of shape nodes that can appear in a shape tree.
pub const SHAPE_NODES: [&str; 7] = [
    "sp",
    "pic",
    "graphicFrame",
    "grpSp",
    "cxnSp",
    "contentPart",
    "AlternateContent",
];
