//! The presentation part and the session state shared by its slides.

use crate::common::xml::XmlElement;
use crate::ooxml::charts::{ChartSeries, ChartSeriesRef, Value};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::{PackURI, PhysPkgReader};
use crate::ooxml::pptx::slide::{ChartPart, PartCache, Slide};
use crate::ooxml::xlsx::{EmbeddedPackageHandle, SpreadsheetCache, resolve};
use std::sync::Arc;

/// A loaded presentation.
///
/// Owns the spreadsheet cache used to resolve chart data: workbooks opened
/// for this presentation stay open until [`Presentation::close`] or drop.
///
/// # Examples
///
/// ```rust,no_run
/// use pptx_resolve::ooxml::pptx::Package;
///
/// let pres = Package::open("deck.pptx")?.presentation()?;
/// for slide in pres.slides() {
///     for shape in slide.classified() {
///         println!("{:?}: {}", shape.id(), shape.variant);
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Presentation {
    package: Arc<PhysPkgReader>,
    part_name: PackURI,
    root: XmlElement,
    slides: Vec<Slide>,
    default_text_style: Option<Arc<XmlElement>>,
    spreadsheets: SpreadsheetCache,
}

/// The relationship id attribute (`r:id`) of an element that may also carry
/// a plain `id`.
fn rel_id(element: &XmlElement) -> Option<&str> {
    element
        .attributes()
        .find(|(key, _)| key.ends_with(":id"))
        .map(|(_, value)| value)
}

impl Presentation {
    pub(crate) fn load(package: Arc<PhysPkgReader>, part_name: PackURI) -> Result<Self> {
        let root = XmlElement::parse(package.blob_for(&part_name)?)?;
        let rels = package.rels_for(&part_name)?;
        let default_text_style = root.child("defaultTextStyle").cloned().map(Arc::new);

        let mut shared = PartCache::new();
        let mut slides = Vec::new();
        if let Some(list) = root.child("sldIdLst") {
            for sld_id in list.children_named("sldId") {
                let r_id = rel_id(sld_id).ok_or_else(|| {
                    OoxmlError::InvalidFormat("p:sldId without a relationship id".to_string())
                })?;
                let slide_part = rels.target_partname(r_id)?;
                slides.push(Slide::load(
                    Arc::clone(&package),
                    slide_part,
                    &mut shared,
                    default_text_style.clone(),
                )?);
            }
        }

        Ok(Self {
            package,
            part_name,
            root,
            slides,
            default_text_style,
            spreadsheets: SpreadsheetCache::new(),
        })
    }

    #[inline]
    pub fn part_name(&self) -> &PackURI {
        &self.part_name
    }

    /// The `p:presentation` element.
    #[inline]
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Slides in `p:sldIdLst` order.
    #[inline]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide width and height in EMUs (`p:sldSz`).
    pub fn slide_size(&self) -> Option<(i64, i64)> {
        let size = self.root.child("sldSz")?;
        Some((size.attr_parse("cx")?, size.attr_parse("cy")?))
    }

    /// `p:defaultTextStyle`, the last font-size fallback before the built-in default.
    pub fn default_text_style(&self) -> Option<&XmlElement> {
        self.default_text_style.as_deref()
    }

    /// Series of the chart hosted by a graphic frame on `slide`.
    pub fn chart_series(&self, slide: &Slide, frame: &XmlElement) -> Result<Vec<ChartSeries>> {
        Ok(slide
            .chart(frame)?
            .map(|chart| chart.series())
            .unwrap_or_default())
    }

    /// Literal values of a series reference of `chart`.
    ///
    /// The cached literal is used when present; otherwise the formula is read
    /// from the chart's embedded workbook through this presentation's cache.
    pub fn series_values(&self, chart: &ChartPart, series_ref: &ChartSeriesRef) -> Result<Vec<Value>> {
        if let Some(literal) = &series_ref.cached_literal {
            return Ok(literal.clone());
        }
        if series_ref.formula.is_none() {
            return Ok(Vec::new());
        }

        let workbook = chart.workbook_part()?.ok_or_else(|| {
            OoxmlError::PartNotFound(format!("embedded workbook of {}", chart.part_name()))
        })?;
        let bytes = self.package.blob_for(&workbook)?;
        let handle = EmbeddedPackageHandle::new(&workbook, bytes);
        resolve(series_ref, &handle, &self.spreadsheets)
    }

    /// Workbooks opened for this presentation.
    #[inline]
    pub fn spreadsheet_cache(&self) -> &SpreadsheetCache {
        &self.spreadsheets
    }

    /// Release every workbook opened for chart data. Later lookups reopen on demand.
    pub fn close(&self) {
        self.spreadsheets.close();
    }
}
