//! Workbook fixtures built in memory with rust_xlsxwriter.
#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};

pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// A number displayed with a date format, read back as a date serial.
    Date(f64),
    Blank,
}

pub use Cell::{Blank, Date, Number, Text};

/// Build an xlsx file with one worksheet per `(name, rows)` entry.
pub fn workbook(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, *s).unwrap();
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n).unwrap();
                    }
                    Cell::Date(serial) => {
                        worksheet
                            .write_number_with_format(r, c, *serial, &date_format)
                            .unwrap();
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// The header row used by most fixtures.
pub fn standard_header() -> Vec<Cell> {
    vec![
        Text("Nama Debitur"),
        Text("Nomor Laporan"),
        Text("Tanggal Penilaian"),
        Text("Nilai Obyek"),
    ]
}
