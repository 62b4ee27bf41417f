//! Raw spreadsheet cell values as handed over by the workbook reader.
//!
//! Date-formatted cells arrive as their numeric serial; ISO date-time cells
//! arrive as text. Conversions here mirror how loosely-typed spreadsheet
//! data is read elsewhere in the system: blanks become `0` or `""`, never
//! an error.

use serde::{Deserialize, Serialize};

/// One cell of a decoded sheet grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// `true` for empty cells and text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Borrow the cell's text, but only for text cells.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display form of the cell, trimmed. Blank cells yield an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Numeric reading of the cell.
    ///
    /// Blank cells read as `0`, text is parsed after trimming, and anything
    /// that does not parse to a finite number reads as `0`.
    pub fn to_number(&self) -> f64 {
        let value = match self {
            Self::Empty => 0.0,
            Self::Number(n) => *n,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Shortest decimal form of a number: `1000` rather than `1000.0`.
///
/// Negative zero prints as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Cell at `index` in `row`, or `None` when the row is shorter.
pub fn cell_at(row: &[CellValue], index: Option<usize>) -> Option<&CellValue> {
    index.and_then(|i| row.get(i))
}

/// `true` when every cell of the row is blank (including a zero-length row).
pub fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_blank)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("x").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn numeric_reading_is_lenient() {
        assert_eq!(CellValue::Number(12.5).to_number(), 12.5);
        assert_eq!(CellValue::from(" 300 ").to_number(), 300.0);
        assert_eq!(CellValue::from("1.000.000").to_number(), 0.0);
        assert_eq!(CellValue::from("abc").to_number(), 0.0);
        assert_eq!(CellValue::from("inf").to_number(), 0.0);
        assert_eq!(CellValue::Empty.to_number(), 0.0);
        assert_eq!(CellValue::Bool(true).to_number(), 1.0);
    }

    #[test]
    fn integers_print_without_fraction() {
        assert_eq!(format_number(1000.0), "1000");
        assert_eq!(format_number(1000.5), "1000.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(CellValue::Number(500000000.0).to_text(), "500000000");
    }

    #[test]
    fn short_rows_have_no_cell() {
        let row = vec![CellValue::from("a")];
        assert!(cell_at(&row, Some(3)).is_none());
        assert!(cell_at(&row, None).is_none());
        assert_eq!(cell_at(&row, Some(0)), Some(&CellValue::from("a")));
    }

    #[test]
    fn blank_rows() {
        assert!(is_blank_row(&[]));
        assert!(is_blank_row(&[CellValue::Empty, CellValue::from(" ")]));
        assert!(!is_blank_row(&[CellValue::Empty, CellValue::Number(1.0)]));
    }
}
