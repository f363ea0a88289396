//! Cell addresses in A1 notation.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell address: column letters plus a 1-based row.
///
/// Column letters are always stored upper-case, so `b3` and `B3` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub column: String,
    pub row: u32,
}

impl CellAddress {
    pub fn new(column: impl AsRef<str>, row: u32) -> Self {
        Self {
            column: column.as_ref().to_ascii_uppercase(),
            row,
        }
    }

    /// Parse a plain reference such as `B12` (no `$`, no sheet prefix).
    ///
    /// Returns `None` for anything else, including row 0.
    pub fn parse(reference: &str) -> Option<Self> {
        let split = reference.find(|c: char| !c.is_ascii_alphabetic())?;
        let (letters, digits) = reference.split_at(split);
        if letters.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let row = digits.parse::<u32>().ok().filter(|&r| r > 0)?;
        Some(Self::new(letters, row))
    }

    /// 1-based column number (A=1, Z=26, AA=27).
    pub fn column_index(&self) -> u32 {
        letters_to_column(&self.column)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Convert a 1-based column number to letters (1 → A, 27 → AA).
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

/// Convert column letters to a 1-based column number (A → 1, AA → 27).
pub fn letters_to_column(letters: &str) -> u32 {
    letters.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(26)
            .saturating_add((b.to_ascii_uppercase() - b'A') as u32 + 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let addr = CellAddress::parse("b12").unwrap();
        assert_eq!(addr.column, "B");
        assert_eq!(addr.row, 12);
        assert_eq!(addr.to_string(), "B12");

        assert!(CellAddress::parse("A0").is_none());
        assert!(CellAddress::parse("12").is_none());
        assert!(CellAddress::parse("A").is_none());
        assert!(CellAddress::parse("A1B").is_none());
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(letters_to_column("AA"), 27);
        assert_eq!(CellAddress::new("xfd", 1).column_index(), 16384);
    }
}
