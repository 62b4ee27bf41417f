//! Spreadsheet decoding.
//!
//! Any format calamine detects (xlsx, xlsm, xlsb, xls, ods) is accepted.
//! Each sheet becomes a dense grid of [`CellValue`]s addressed from cell
//! A1, so row positions match what the author sees.

use std::io::Cursor;

use appraisal_core::cell::CellValue;
use calamine::{open_workbook_auto_from_rs, Data, Reader};

/// One decoded sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SheetReadError {
    #[error("failed to read spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Decode every sheet of a workbook, in workbook order.
pub fn read_workbook(bytes: Vec<u8>) -> Result<Vec<SheetGrid>, SheetReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        // Range coordinates are relative to the first used cell.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(convert_value));
            rows.push(cells);
        }

        sheets.push(SheetGrid { name, rows });
    }
    Ok(sheets)
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        // Date-formatted cells keep their serial; smart fill converts them.
        Data::DateTime(v) => CellValue::Number(v.as_f64()),
        Data::DateTimeIso(v) | Data::DurationIso(v) => CellValue::Text(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_a_read_error() {
        let result = read_workbook(b"definitely not a workbook".to_vec());
        assert!(matches!(result, Err(SheetReadError::Workbook(_))));
    }

    #[test]
    fn scalar_conversion() {
        assert_eq!(convert_value(&Data::Int(5)), CellValue::Number(5.0));
        assert_eq!(
            convert_value(&Data::String("Budi".into())),
            CellValue::from("Budi")
        );
        assert_eq!(convert_value(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_value(&Data::DateTimeIso("2024-01-10T00:00:00".into())),
            CellValue::from("2024-01-10T00:00:00")
        );
    }
}
