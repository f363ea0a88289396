//! Chart parts: kind detection and series data references.
//!
//! A chart graphic frame points at a chart part (`c:chartSpace`) through
//! `c:chart@r:id`. The part's plot area decides the [`ChartKind`]; its series
//! carry [`ChartSeriesRef`]s that are resolved against the chart's embedded
//! workbook by [`crate::ooxml::xlsx::resolve`].

pub mod series;
pub mod types;

pub use series::{ChartSeries, ChartSeriesRef, Value, ValueKind, parse_chart_series};
pub use types::{ChartKind, chart_groups, detect_chart_kind};
