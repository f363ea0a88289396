//! Read-only view of a workbook embedded behind a chart.
//!
//! Opening a workbook inflates the whole package into memory, reads the sheet
//! list and the shared strings table, and then lets go of the ZIP archive.
//! Worksheets are parsed on first access and kept for the workbook's lifetime.

use super::cell::{CellAddress, column_to_letters, letters_to_column};
use super::range::{MAX_COLUMN, MAX_ROW};
use super::shared_strings::{SharedStrings, item_text};
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::{PackURI, PhysPkgReader};
use once_cell::sync::OnceCell;
use std::collections::HashMap;

const DEFAULT_WORKBOOK_PART: &str = "/xl/workbook.xml";

/// A workbook opened from an embedded `.xlsx` package.
#[derive(Debug)]
pub struct EmbeddedWorkbook {
    package: PhysPkgReader,
    sheets: Vec<SheetEntry>,
    shared_strings: SharedStrings,
}

#[derive(Debug)]
struct SheetEntry {
    name: String,
    part: PackURI,
    worksheet: OnceCell<Worksheet>,
}

impl EmbeddedWorkbook {
    /// Open a workbook from the raw bytes of an embedded package part.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let package = PhysPkgReader::from_bytes(bytes)?;

        let workbook_part = match package.package_rels()?.first_of_type(rt::OFFICE_DOCUMENT) {
            Some(rel) => PackURI::from_rel_ref("/", rel.target_ref())?,
            None => PackURI::new(DEFAULT_WORKBOOK_PART)?,
        };
        let workbook = XmlElement::parse(package.blob_for(&workbook_part)?)?;
        let rels = package.rels_for(&workbook_part)?;

        let mut sheets = Vec::new();
        if let Some(list) = workbook.child("sheets") {
            for sheet in list.children_named("sheet") {
                let (Some(name), Some(r_id)) = (sheet.attr("name"), sheet.attr("id")) else {
                    return Err(OoxmlError::InvalidFormat(
                        "workbook sheet entry without name or r:id".to_string(),
                    ));
                };
                sheets.push(SheetEntry {
                    name: name.to_string(),
                    part: rels.target_partname(r_id)?,
                    worksheet: OnceCell::new(),
                });
            }
        }

        let shared_strings = match rels.first_of_type(rt::SHARED_STRINGS) {
            Some(rel) => {
                let part = PackURI::from_rel_ref(rels.base_uri(), rel.target_ref())?;
                SharedStrings::parse(package.blob_for(&part)?)?
            },
            None => SharedStrings::new(),
        };

        Ok(Self {
            package,
            sheets,
            shared_strings,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|s| s.name.as_str())
    }

    #[inline]
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Worksheet by name. Names match exactly first, then ignoring ASCII
    /// case; an empty name selects the first sheet.
    pub fn worksheet(&self, name: &str) -> Result<&Worksheet> {
        let entry = if name.is_empty() {
            self.sheets.first()
        } else {
            self.sheets
                .iter()
                .find(|s| s.name == name)
                .or_else(|| self.sheets.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
        }
        .ok_or_else(|| OoxmlError::SheetNotFound(name.to_string()))?;

        entry.worksheet.get_or_try_init(|| {
            let xml = self.package.blob_for(&entry.part)?;
            Worksheet::parse(&entry.name, xml, &self.shared_strings)
        })
    }
}

/// Cell text of one worksheet, keyed by address.
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    cells: HashMap<CellAddress, String>,
}

impl Worksheet {
    /// Parse a worksheet part, resolving shared and inline strings to text.
    ///
    /// Cells without an `r` attribute take the next column of the current row,
    /// rows without one the next row. Addresses past the sheet limits are an error.
    pub fn parse(name: &str, xml: &[u8], shared_strings: &SharedStrings) -> Result<Self> {
        let root = XmlElement::parse(xml)?;
        let mut cells = HashMap::new();

        if let Some(data) = root.child("sheetData") {
            let mut row_number = 0u32;
            for row in data.children_named("row") {
                row_number = match row.attr_parse::<u32>("r") {
                    Some(r) => r,
                    None => row_number.saturating_add(1),
                };
                if row_number > MAX_ROW {
                    return Err(OoxmlError::InvalidFormat(format!(
                        "row {} of sheet '{}' is past the last row ({})",
                        row_number, name, MAX_ROW
                    )));
                }
                let mut column = 0u32;
                for cell in row.children_named("c") {
                    let address = match cell.attr("r").and_then(CellAddress::parse) {
                        Some(address) => address,
                        None => CellAddress::new(
                            column_to_letters(column.saturating_add(1)),
                            row_number,
                        ),
                    };
                    column = letters_to_column(&address.column);
                    if column > MAX_COLUMN || address.row > MAX_ROW {
                        return Err(OoxmlError::InvalidFormat(format!(
                            "cell {} of sheet '{}' is outside the sheet",
                            address, name
                        )));
                    }
                    let text = cell_text(cell, shared_strings)?;
                    cells.insert(address, text);
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            cells,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text of a cell present in the worksheet (possibly empty).
    pub fn cell(&self, address: &CellAddress) -> Option<&str> {
        self.cells.get(address).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn cell_text(cell: &XmlElement, shared_strings: &SharedStrings) -> Result<String> {
    let value = cell.child("v").map(XmlElement::text).unwrap_or("");
    match cell.attr("t").unwrap_or("n") {
        "s" => {
            let index: usize = value.trim().parse().map_err(|_| {
                OoxmlError::InvalidFormat(format!("shared string index '{}' is not a number", value))
            })?;
            shared_strings.get(index).map(str::to_string).ok_or_else(|| {
                OoxmlError::InvalidFormat(format!("shared string index {} out of range", index))
            })
        },
        "inlineStr" => Ok(cell.child("is").map(item_text).unwrap_or_default()),
        _ => Ok(value.to_string()),
    }
}
