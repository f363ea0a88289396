//! Chart series and their data references.
//!
//! Every data-bearing child of a `c:ser` (name, categories, values, x/y
//! values) is either a reference into the embedded workbook (`c:numRef`,
//! `c:strRef`) with an optional snapshot cache, or an inline literal
//! (`c:numLit`, `c:strLit`). Both collapse into a [`ChartSeriesRef`].

use crate::common::xml::XmlElement;

/// A single resolved data value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

/// Type a reference is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
}

/// Data reference of one series dimension.
///
/// The cached literal always wins when present, even if it is stale: it is
/// the snapshot the authoring tool rendered. The formula is only consulted
/// when no cache was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeriesRef {
    pub cached_literal: Option<Vec<Value>>,
    pub formula: Option<String>,
    pub kind: ValueKind,
}

impl ChartSeriesRef {
    pub fn from_formula(formula: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            cached_literal: None,
            formula: Some(formula.into()),
            kind,
        }
    }

    pub fn from_literal(values: Vec<Value>, kind: ValueKind) -> Self {
        Self {
            cached_literal: Some(values),
            formula: None,
            kind,
        }
    }

    /// Read the reference held by a series dimension element
    /// (`c:tx`, `c:cat`, `c:val`, `c:xVal` or `c:yVal`).
    ///
    /// Returns `None` when the element carries no recognizable data source.
    pub fn from_element(dimension: &XmlElement) -> Option<Self> {
        for source in dimension.children() {
            match source.local_name() {
                "numRef" => {
                    return Some(Self {
                        cached_literal: source
                            .child("numCache")
                            .map(|c| points(c, ValueKind::Number)),
                        formula: formula(source),
                        kind: ValueKind::Number,
                    });
                },
                "strRef" => {
                    return Some(Self {
                        cached_literal: source
                            .child("strCache")
                            .map(|c| points(c, ValueKind::Text)),
                        formula: formula(source),
                        kind: ValueKind::Text,
                    });
                },
                "multiLvlStrRef" => {
                    // Only the innermost level carries one label per point
                    let cache = source.child("multiLvlStrCache").map(|c| {
                        c.child("lvl")
                            .map_or_else(Vec::new, |lvl| points(lvl, ValueKind::Text))
                    });
                    return Some(Self {
                        cached_literal: cache,
                        formula: formula(source),
                        kind: ValueKind::Text,
                    });
                },
                "numLit" => {
                    let values = points(source, ValueKind::Number);
                    return Some(Self::from_literal(values, ValueKind::Number));
                },
                "strLit" => {
                    let values = points(source, ValueKind::Text);
                    return Some(Self::from_literal(values, ValueKind::Text));
                },
                // A series name given as plain text
                "v" => {
                    return Some(Self::from_literal(
                        vec![Value::Text(source.text().to_string())],
                        ValueKind::Text,
                    ));
                },
                _ => {},
            }
        }
        None
    }
}

fn formula(source: &XmlElement) -> Option<String> {
    source
        .child("f")
        .map(|f| f.text().trim().to_string())
        .filter(|f| !f.is_empty())
}

/// Cached points ordered by `idx`. Missing indices are not filled in.
fn points(cache: &XmlElement, kind: ValueKind) -> Vec<Value> {
    let mut pts: Vec<(u32, Value)> = cache
        .children_named("pt")
        .enumerate()
        .map(|(pos, pt)| {
            let idx = pt.attr_parse("idx").unwrap_or(pos as u32);
            let text = pt.child("v").map(XmlElement::text).unwrap_or("");
            let value = match kind {
                ValueKind::Number => fast_float2::parse::<f64, _>(text.trim())
                    .map(Value::Number)
                    .unwrap_or_else(|_| Value::Text(text.to_string())),
                ValueKind::Text => Value::Text(text.to_string()),
            };
            (idx, value)
        })
        .collect();
    pts.sort_by_key(|(idx, _)| *idx);
    pts.into_iter().map(|(_, v)| v).collect()
}

/// One `c:ser` of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub index: u32,
    pub order: u32,
    /// Local name of the chart group holding this series (e.g. `barChart`)
    pub group: String,
    pub name: Option<ChartSeriesRef>,
    pub categories: Option<ChartSeriesRef>,
    pub values: Option<ChartSeriesRef>,
    pub x_values: Option<ChartSeriesRef>,
    pub y_values: Option<ChartSeriesRef>,
}

impl ChartSeries {
    pub fn from_element(ser: &XmlElement, group: &str) -> Self {
        let dimension = |local: &str| ser.child(local).and_then(ChartSeriesRef::from_element);
        Self {
            index: ser.child("idx").and_then(|e| e.attr_parse("val")).unwrap_or(0),
            order: ser.child("order").and_then(|e| e.attr_parse("val")).unwrap_or(0),
            group: group.to_string(),
            name: dimension("tx"),
            categories: dimension("cat"),
            values: dimension("val"),
            x_values: dimension("xVal"),
            y_values: dimension("yVal"),
        }
    }
}

/// Every series of a chart part, grouped charts first to last.
pub fn parse_chart_series(chart_space: &XmlElement) -> Vec<ChartSeries> {
    let Some(plot_area) = chart_space.find("plotArea") else {
        return Vec::new();
    };
    plot_area
        .children()
        .iter()
        .filter(|group| group.local_name().ends_with("Chart"))
        .flat_map(|group| {
            group
                .children_named("ser")
                .map(move |ser| ChartSeries::from_element(ser, group.local_name()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"<c:chartSpace xmlns:c="urn:c"><c:chart><c:plotArea>
<c:barChart>
  <c:ser>
    <c:idx val="0"/><c:order val="0"/>
    <c:tx><c:strRef><c:f>Sheet1!$B$1</c:f><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>Sales</c:v></c:pt></c:strCache></c:strRef></c:tx>
    <c:cat><c:strRef><c:f>Sheet1!$A$2:$A$4</c:f></c:strRef></c:cat>
    <c:val><c:numRef><c:f>Sheet1!$B$2:$B$4</c:f><c:numCache><c:pt idx="2"><c:v>3</c:v></c:pt><c:pt idx="0"><c:v>1.5</c:v></c:pt></c:numCache></c:numRef></c:val>
  </c:ser>
</c:barChart>
<c:lineChart>
  <c:ser><c:idx val="1"/><c:order val="1"/><c:tx><c:v>Trend</c:v></c:tx>
    <c:val><c:numLit><c:pt idx="0"><c:v>4</c:v></c:pt></c:numLit></c:val></c:ser>
</c:lineChart>
<c:catAx/>
</c:plotArea></c:chart></c:chartSpace>"#;

    #[test]
    fn test_series_references() {
        let chart = XmlElement::parse(CHART.as_bytes()).unwrap();
        let series = parse_chart_series(&chart);
        assert_eq!(series.len(), 2);

        let bar = &series[0];
        assert_eq!(bar.group, "barChart");
        let name = bar.name.as_ref().unwrap();
        assert_eq!(name.cached_literal, Some(vec![Value::Text("Sales".into())]));
        assert_eq!(name.formula.as_deref(), Some("Sheet1!$B$1"));

        let cats = bar.categories.as_ref().unwrap();
        assert_eq!(cats.cached_literal, None);
        assert_eq!(cats.kind, ValueKind::Text);

        let values = bar.values.as_ref().unwrap();
        assert_eq!(
            values.cached_literal,
            Some(vec![Value::Number(1.5), Value::Number(3.0)])
        );
        assert_eq!(values.kind, ValueKind::Number);

        let line = &series[1];
        assert_eq!(line.index, 1);
        assert_eq!(
            line.name.as_ref().unwrap().cached_literal,
            Some(vec![Value::Text("Trend".into())])
        );
        assert_eq!(line.values.as_ref().unwrap().formula, None);
        assert!(line.x_values.is_none());
    }
}
