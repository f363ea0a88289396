//! Chart kinds and plot-area sub-type detection.

use crate::common::xml::XmlElement;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Kind of chart hosted by a graphic frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Scatter,
    /// More than one chart group shares the plot area
    Combo,
    /// Any other group element, by its raw local name (empty when the plot
    /// area holds no chart group at all)
    Other(String),
}

/// Lower-cased group element names to their kind.
static CHART_GROUPS: phf::Map<&'static str, ChartKind> = phf_map! {
    "linechart" => ChartKind::Line,
    "line3dchart" => ChartKind::Line,
    "barchart" => ChartKind::Bar,
    "bar3dchart" => ChartKind::Bar,
    "piechart" => ChartKind::Pie,
    "pie3dchart" => ChartKind::Pie,
    "scatterchart" => ChartKind::Scatter,
};

impl ChartKind {
    /// Map a single chart group element name, ignoring ASCII case.
    pub fn from_group_name(name: &str) -> Self {
        CHART_GROUPS
            .get(name.to_ascii_lowercase().as_str())
            .cloned()
            .unwrap_or_else(|| ChartKind::Other(name.to_string()))
    }

    #[inline]
    pub fn is_combo(&self) -> bool {
        matches!(self, ChartKind::Combo)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
            ChartKind::Pie => f.write_str("pie"),
            ChartKind::Scatter => f.write_str("scatter"),
            ChartKind::Combo => f.write_str("combo"),
            ChartKind::Other(raw) => write!(f, "other({})", raw),
        }
    }
}

/// Chart group children of a plot area: every child whose local name ends in `Chart`.
pub fn chart_groups(plot_area: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    plot_area
        .children()
        .iter()
        .filter(|child| child.local_name().ends_with("Chart"))
}

/// Decide the kind of a chart from its plot area.
///
/// `root` may be the `c:plotArea` itself or any ancestor of it (a chart
/// space or a graphic frame carrying the chart inline).
pub fn detect_chart_kind(root: &XmlElement) -> ChartKind {
    let plot_area = if root.is("plotArea") {
        Some(root)
    } else {
        root.find("plotArea")
    };
    let Some(plot_area) = plot_area else {
        return ChartKind::Other(String::new());
    };

    let mut groups = chart_groups(plot_area);
    let kind = match (groups.next(), groups.next()) {
        (None, _) => ChartKind::Other(String::new()),
        (Some(only), None) => ChartKind::from_group_name(only.local_name()),
        (Some(_), Some(_)) => ChartKind::Combo,
    };
    trace!(%kind, "detected chart kind");
    kind
}
