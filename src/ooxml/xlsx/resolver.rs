//! Resolution of chart series references into literal values.
//!
//! Workbooks are opened through a [`SpreadsheetCache`] owned by the
//! presentation session, so repeated lookups against the same embedded
//! package parse it only once. The cache lives exactly as long as its owner
//! and can be emptied early with [`SpreadsheetCache::close`].

use super::range::parse_range_formula;
use super::workbook::EmbeddedWorkbook;
use crate::ooxml::charts::{ChartSeriesRef, Value, ValueKind};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::PackURI;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// An embedded spreadsheet package: its part name (the cache key) and bytes.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedPackageHandle<'a> {
    part_name: &'a PackURI,
    bytes: &'a [u8],
}

impl<'a> EmbeddedPackageHandle<'a> {
    pub fn new(part_name: &'a PackURI, bytes: &'a [u8]) -> Self {
        Self { part_name, bytes }
    }

    #[inline]
    pub fn part_name(&self) -> &PackURI {
        self.part_name
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

/// Workbooks opened during one presentation session, keyed by embedded part name.
#[derive(Debug, Default)]
pub struct SpreadsheetCache {
    open: Mutex<HashMap<PackURI, Arc<EmbeddedWorkbook>>>,
    opens: AtomicUsize,
}

impl SpreadsheetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached workbook for `package`, opening it on first use.
    ///
    /// The lock is held while a workbook is opened, so concurrent callers
    /// never open the same package twice.
    pub fn get_or_open(
        &self,
        package: &EmbeddedPackageHandle<'_>,
    ) -> Result<Arc<EmbeddedWorkbook>> {
        let mut open = self.open.lock();
        if let Some(workbook) = open.get(package.part_name()) {
            debug!(part = %package.part_name(), "spreadsheet cache hit");
            return Ok(Arc::clone(workbook));
        }

        debug!(part = %package.part_name(), "spreadsheet cache miss; opening workbook");
        let workbook = Arc::new(EmbeddedWorkbook::from_bytes(package.bytes())?);
        self.opens.fetch_add(1, Ordering::Relaxed);
        open.insert(package.part_name().clone(), Arc::clone(&workbook));
        Ok(workbook)
    }

    /// Number of workbooks opened (cache misses) since creation.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::Relaxed)
    }

    pub fn contains(&self, part_name: &PackURI) -> bool {
        self.open.lock().contains_key(part_name)
    }

    pub fn len(&self) -> usize {
        self.open.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.lock().is_empty()
    }

    /// Drop every cached workbook. Later lookups reopen on demand.
    pub fn close(&self) {
        let mut open = self.open.lock();
        if !open.is_empty() {
            debug!(count = open.len(), "closing cached workbooks");
        }
        open.clear();
    }
}

/// Resolve a series reference to literal values.
///
/// A cached literal is returned as-is. Otherwise the formula is parsed and
/// every address read from the embedded workbook, in formula order, as the
/// reference's [`ValueKind`]. Numeric references read an empty cell as `0`; any other non-numeric text is an
/// [`OoxmlError::InvalidCellValue`]. A reference with neither a cache nor a
/// formula resolves to no values.
pub fn resolve(
    series_ref: &ChartSeriesRef,
    package: &EmbeddedPackageHandle<'_>,
    cache: &SpreadsheetCache,
) -> Result<Vec<Value>> {
    if let Some(literal) = &series_ref.cached_literal {
        return Ok(literal.clone());
    }
    let Some(formula) = &series_ref.formula else {
        return Ok(Vec::new());
    };

    let range = parse_range_formula(formula)?;
    let workbook = cache.get_or_open(package)?;
    let sheet = workbook.worksheet(&range.sheet_name)?;

    range
        .addresses
        .iter()
        .map(|address| {
            let text = sheet.cell(address).ok_or_else(|| OoxmlError::CellNotFound {
                sheet: sheet.name().to_string(),
                cell: address.to_string(),
            })?;
            match series_ref.kind {
                ValueKind::Text => Ok(Value::Text(text.to_string())),
                ValueKind::Number => parse_number(text).map(Value::Number).ok_or_else(|| {
                    OoxmlError::InvalidCellValue {
                        cell: address.to_string(),
                        text: text.to_string(),
                    }
                }),
            }
        })
        .collect()
}

/// Invariant-culture number parsing; empty text is zero.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    fast_float2::parse::<f64, _>(text).ok()
}
