//! Range formulas used by chart series (`Sheet1!$A$2:$A$5`).
//!
//! A chart series points into its embedded workbook with a formula made of
//! one or more comma-separated items, each a single cell or a single-column
//! run of cells. The parser is a small recursive-descent reader over the
//! formula bytes that expands every item into literal addresses, in order.
//!
//! ```text
//! formula := item (',' item)*
//! item    := [sheet '!'] cell [':' [sheet '!'] cell]
//! sheet   := quoted-name | bare-name
//! cell    := ['$'] letters ['$'] digits
//! ```
//!
//! Enclosing parentheses are stripped, `$` anchors are ignored, and quoted
//! sheet names may escape a quote by doubling it.

use super::cell::{CellAddress, letters_to_column};
use crate::ooxml::error::{OoxmlError, Result};
use tracing::warn;

/// Last addressable row of a worksheet.
pub const MAX_ROW: u32 = 1_048_576;
/// Last addressable column (XFD).
pub const MAX_COLUMN: u32 = 16_384;

/// A parsed range formula: the sheet it names and every address it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// Sheet named by the first prefix; empty when the formula names none
    pub sheet_name: String,
    pub addresses: Vec<CellAddress>,
}

/// Parse a range formula into its ordered list of addresses.
///
/// # Examples
///
/// ```
/// use pptx_resolve::ooxml::xlsx::parse_range;
///
/// let cells = parse_range("Sheet1!B1,B3:B4").unwrap();
/// let names: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
/// assert_eq!(names, ["B1", "B3", "B4"]);
/// ```
pub fn parse_range(formula: &str) -> Result<Vec<CellAddress>> {
    Ok(parse_range_formula(formula)?.addresses)
}

/// Parse a range formula, keeping the sheet name.
pub fn parse_range_formula(formula: &str) -> Result<CellRange> {
    let mut parser = RangeParser::new(formula);
    let addresses = parser.parse_list()?;
    Ok(CellRange {
        sheet_name: parser.sheet.unwrap_or_default(),
        addresses,
    })
}

struct RangeParser<'a> {
    formula: &'a str,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    sheet: Option<String>,
}

impl<'a> RangeParser<'a> {
    fn new(formula: &'a str) -> Self {
        let bytes = formula.as_bytes();
        let mut start = 0;
        let mut end = bytes.len();
        loop {
            while start < end && bytes[start].is_ascii_whitespace() {
                start += 1;
            }
            while end > start && bytes[end - 1].is_ascii_whitespace() {
                end -= 1;
            }
            if end - start >= 2 && bytes[start] == b'(' && bytes[end - 1] == b')' {
                start += 1;
                end -= 1;
            } else {
                break;
            }
        }
        Self {
            formula,
            bytes,
            pos: start,
            end,
            sheet: None,
        }
    }

    fn error(&self, reason: impl Into<String>) -> OoxmlError {
        OoxmlError::MalformedFormula {
            formula: self.formula.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        (self.pos < self.end).then(|| self.bytes[self.pos])
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_list(&mut self) -> Result<Vec<CellAddress>> {
        if self.peek().is_none() {
            return Err(self.error("empty formula"));
        }
        let mut out = Vec::new();
        loop {
            self.parse_item(&mut out)?;
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(b',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek().is_none() {
                        return Err(self.error("trailing separator"));
                    }
                },
                Some(other) => {
                    return Err(self.error(format!("unexpected character '{}'", other as char)));
                },
            }
        }
        Ok(out)
    }

    fn parse_item(&mut self, out: &mut Vec<CellAddress>) -> Result<()> {
        self.parse_sheet_prefix()?;
        let first = self.parse_cell()?;
        if self.peek() != Some(b':') {
            out.push(first);
            return Ok(());
        }
        self.pos += 1;
        self.parse_sheet_prefix()?;
        let last = self.parse_cell()?;

        if first.column != last.column {
            return Err(self.error(format!(
                "range {}:{} spans more than one column",
                first, last
            )));
        }
        if first.row > last.row {
            return Err(self.error(format!("range {}:{} runs backwards", first, last)));
        }
        out.extend((first.row..=last.row).map(|row| CellAddress {
            column: first.column.clone(),
            row,
        }));
        Ok(())
    }

    /// Consume an optional `Sheet!` or `'Sheet name'!` prefix.
    fn parse_sheet_prefix(&mut self) -> Result<()> {
        let name = match self.peek() {
            Some(b'\'') => {
                self.pos += 1;
                let mut name = Vec::new();
                loop {
                    match self.peek() {
                        None => return Err(self.error("unterminated quoted sheet name")),
                        Some(b'\'') if self.bytes.get(self.pos + 1) == Some(&b'\'') => {
                            name.push(b'\'');
                            self.pos += 2;
                        },
                        Some(b'\'') => {
                            self.pos += 1;
                            break;
                        },
                        Some(b) => {
                            name.push(b);
                            self.pos += 1;
                        },
                    }
                }
                if self.peek() != Some(b'!') {
                    return Err(self.error("expected '!' after sheet name"));
                }
                self.pos += 1;
                String::from_utf8_lossy(&name).into_owned()
            },
            _ => {
                let rest = &self.bytes[self.pos..self.end];
                let stop = rest
                    .iter()
                    .position(|&b| matches!(b, b',' | b':' | b'!'))
                    .unwrap_or(rest.len());
                if rest.get(stop) != Some(&b'!') {
                    return Ok(());
                }
                if stop == 0 {
                    return Err(self.error("empty sheet name"));
                }
                let name = String::from_utf8_lossy(&rest[..stop]).into_owned();
                self.pos += stop + 1;
                name
            },
        };
        self.record_sheet(name);
        Ok(())
    }

    fn record_sheet(&mut self, name: String) {
        let Some(first) = &self.sheet else {
            self.sheet = Some(name);
            return;
        };
        if !first.eq_ignore_ascii_case(&name) {
            warn!(
                formula = self.formula,
                sheet = %first,
                ignored = %name,
                "range formula names a second sheet; using the first"
            );
        }
    }

    fn parse_cell(&mut self) -> Result<CellAddress> {
        if self.peek() == Some(b'$') {
            self.pos += 1;
        }
        let letters_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        if self.pos == letters_start {
            return Err(self.error("expected column letters"));
        }
        let letters = &self.formula[letters_start..self.pos];
        if letters.len() > 3 || letters_to_column(letters) > MAX_COLUMN {
            return Err(self.error(format!("column {} is beyond XFD", letters)));
        }

        if self.peek() == Some(b'$') {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(self.error("expected row number"));
        }
        let row = self.formula[digits_start..self.pos]
            .parse::<u32>()
            .ok()
            .filter(|&row| row <= MAX_ROW)
            .ok_or_else(|| self.error("row number out of range"))?;
        if row == 0 {
            return Err(self.error("row numbers start at 1"));
        }

        Ok(CellAddress::new(letters, row))
    }
}
