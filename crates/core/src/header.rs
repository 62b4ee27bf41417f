//! Header row detection and header-label to field mapping.
//!
//! Workbooks are human-authored: the header row can sit anywhere in the
//! first [`HEADER_SCAN_ROWS`] rows, below titles and logos. The row that
//! mentions the most domain keywords wins.

use serde::Serialize;

use crate::cell::{is_blank_row, CellValue};

/// Number of leading rows examined for a header.
pub const HEADER_SCAN_ROWS: usize = 100;

/// Minimum number of distinct keywords a header row must mention.
pub const MIN_HEADER_SCORE: usize = 3;

/// Domain terms whose presence marks a header row.
pub const HEADER_KEYWORDS: &[&str] = &[
    "nama", "debitur", "tanggal", "laporan", "nilai", "obyek", "luas", "tanah", "kota", "alamat",
    "cabang",
];

/// Semantic record fields a column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ReportNumber,
    AppraisalDate,
    ObjectValue,
    BorrowerName,
    City,
    Address,
    Client,
    Branch,
    LegalStatus,
    Appraiser,
    LandArea,
    BuildingArea,
    OfferValue,
}

/// How a header label matched a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// The label names the field unambiguously.
    Field(Field),
    /// The label only mentions "nama"; used for the borrower when no
    /// explicit borrower column exists.
    WeakName,
}

/// Count the distinct keywords mentioned anywhere in the row.
pub fn header_score(row: &[CellValue]) -> usize {
    let text = row
        .iter()
        .map(|cell| cell.to_text().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    HEADER_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .count()
}

/// Index of the header row, or `None` when no row among the first
/// [`HEADER_SCAN_ROWS`] reaches [`MIN_HEADER_SCORE`].
///
/// Ties keep the earlier row.
pub fn detect_header_row(rows: &[Vec<CellValue>]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        if is_blank_row(row) {
            continue;
        }
        let score = header_score(row);
        if score < MIN_HEADER_SCORE {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

/// Classify one header label. The label is lower-cased and trimmed first;
/// the first matching rule wins.
pub fn classify_header(label: &str) -> Option<HeaderMatch> {
    let c = label.trim().to_lowercase();
    if c.is_empty() {
        return None;
    }
    let field = if c.contains("nomor") && c.contains("laporan") {
        Field::ReportNumber
    } else if c.contains("tanggal") && c.contains("penilaian") {
        Field::AppraisalDate
    } else if c.contains("nilai") && (c.contains("obyek") || c.contains("objek")) {
        Field::ObjectValue
    } else if c.contains("nama") && c.contains("debitur") {
        Field::BorrowerName
    } else if c.contains("kota") || c == "kab/kotamadya" {
        Field::City
    } else if c.contains("alamat") {
        Field::Address
    } else if c.contains("pemberi") || c.contains("bank") {
        Field::Client
    } else if c.contains("cabang") {
        Field::Branch
    } else if c.contains("legalitas") {
        Field::LegalStatus
    } else if c.contains("penilai") {
        Field::Appraiser
    } else if c == "luas" || c.contains("luas tanah") {
        Field::LandArea
    } else if c.contains("luas bangunan") {
        Field::BuildingArea
    } else if c.contains("penawaran") || c.contains("likuidasi") {
        Field::OfferValue
    } else if c.contains("nama") {
        return Some(HeaderMatch::WeakName);
    } else {
        return None;
    };
    Some(HeaderMatch::Field(field))
}

/// Column index for each mapped field of a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub report_number: Option<usize>,
    pub appraisal_date: Option<usize>,
    pub object_value: Option<usize>,
    pub borrower_name: Option<usize>,
    pub city: Option<usize>,
    pub address: Option<usize>,
    pub client: Option<usize>,
    pub branch: Option<usize>,
    pub legal_status: Option<usize>,
    pub appraiser: Option<usize>,
    pub land_area: Option<usize>,
    pub building_area: Option<usize>,
    pub offer_value: Option<usize>,
}

impl ColumnMap {
    /// Map header labels left to right. A later column naming the same
    /// field replaces an earlier one.
    ///
    /// When a land-area column exists but no building-area column does,
    /// building area is read from the column right of land area (the
    /// usual "Luas" merged header over tanah/bangunan sub-columns).
    pub fn from_header(header: &[CellValue]) -> Self {
        let mut map = Self::default();
        for (index, cell) in header.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            match classify_header(&cell.to_text()) {
                Some(HeaderMatch::Field(field)) => *map.slot_mut(field) = Some(index),
                Some(HeaderMatch::WeakName) => {
                    if map.borrower_name.is_none() {
                        map.borrower_name = Some(index);
                    }
                }
                None => {}
            }
        }
        if let (Some(land), None) = (map.land_area, map.building_area) {
            map.building_area = Some(land + 1);
        }
        map
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::ReportNumber => self.report_number,
            Field::AppraisalDate => self.appraisal_date,
            Field::ObjectValue => self.object_value,
            Field::BorrowerName => self.borrower_name,
            Field::City => self.city,
            Field::Address => self.address,
            Field::Client => self.client,
            Field::Branch => self.branch,
            Field::LegalStatus => self.legal_status,
            Field::Appraiser => self.appraiser,
            Field::LandArea => self.land_area,
            Field::BuildingArea => self.building_area,
            Field::OfferValue => self.offer_value,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::ReportNumber => &mut self.report_number,
            Field::AppraisalDate => &mut self.appraisal_date,
            Field::ObjectValue => &mut self.object_value,
            Field::BorrowerName => &mut self.borrower_name,
            Field::City => &mut self.city,
            Field::Address => &mut self.address,
            Field::Client => &mut self.client,
            Field::Branch => &mut self.branch,
            Field::LegalStatus => &mut self.legal_status,
            Field::Appraiser => &mut self.appraiser,
            Field::LandArea => &mut self.land_area,
            Field::BuildingArea => &mut self.building_area,
            Field::OfferValue => &mut self.offer_value,
        }
    }
}

/// The data region of a sheet: its column map and the rows after the header.
#[derive(Debug)]
pub struct Table<'a> {
    pub header_index: usize,
    pub columns: ColumnMap,
    pub rows: &'a [Vec<CellValue>],
}

/// Locate the header and data rows of a grid. `None` means the sheet has
/// no recognisable table and yields no records.
pub fn locate_table(grid: &[Vec<CellValue>]) -> Option<Table<'_>> {
    let header_index = detect_header_row(grid)?;
    Some(Table {
        header_index,
        columns: ColumnMap::from_header(&grid[header_index]),
        rows: &grid[header_index + 1..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::from(*c)
                }
            })
            .collect()
    }

    // -- detect_header_row tests --

    #[test]
    fn test_header_found_below_title_rows() {
        let grid = vec![
            row(&["LAPORAN BULANAN"]),
            row(&[]),
            row(&["No", "Nama Debitur", "Kota", "Nilai Obyek"]),
            row(&["1", "Budi", "Bandung", "100"]),
        ];
        assert_eq!(detect_header_row(&grid), Some(2));
    }

    #[test]
    fn test_rows_below_threshold_yield_none() {
        let grid = vec![row(&["Nama", "Kota"]), row(&["Budi", "Bandung"])];
        assert_eq!(detect_header_row(&grid), None);
    }

    #[test]
    fn test_ties_keep_earlier_row() {
        let grid = vec![
            row(&["Nama", "Kota", "Alamat"]),
            row(&["Nama", "Kota", "Cabang"]),
        ];
        assert_eq!(detect_header_row(&grid), Some(0));
    }

    #[test]
    fn test_higher_score_later_wins() {
        let grid = vec![
            row(&["Nama", "Kota", "Alamat"]),
            row(&["Nama Debitur", "Kota", "Alamat", "Nilai Obyek"]),
        ];
        assert_eq!(detect_header_row(&grid), Some(1));
    }

    #[test]
    fn test_only_first_hundred_rows_scanned() {
        let mut grid: Vec<Vec<CellValue>> = (0..100).map(|_| row(&["x"])).collect();
        grid.push(row(&["Nama Debitur", "Kota", "Alamat"]));
        assert_eq!(detect_header_row(&grid), None);
    }

    #[test]
    fn test_keywords_counted_once() {
        assert_eq!(header_score(&row(&["nama", "nama", "nama"])), 1);
        assert_eq!(header_score(&row(&["Nama Debitur"])), 2);
    }

    // -- classify_header tests --

    #[test]
    fn test_classification_precedence() {
        assert_eq!(
            classify_header("Nomor Laporan"),
            Some(HeaderMatch::Field(Field::ReportNumber))
        );
        assert_eq!(
            classify_header("Tanggal Penilaian"),
            Some(HeaderMatch::Field(Field::AppraisalDate))
        );
        assert_eq!(
            classify_header("Nilai Objek (Rp)"),
            Some(HeaderMatch::Field(Field::ObjectValue))
        );
        assert_eq!(
            classify_header(" NAMA DEBITUR "),
            Some(HeaderMatch::Field(Field::BorrowerName))
        );
        assert_eq!(
            classify_header("Kab/Kotamadya"),
            Some(HeaderMatch::Field(Field::City))
        );
        assert_eq!(
            classify_header("Bank Pemberi Tugas"),
            Some(HeaderMatch::Field(Field::Client))
        );
        assert_eq!(
            classify_header("Nama Penilai"),
            Some(HeaderMatch::Field(Field::Appraiser))
        );
        assert_eq!(classify_header("Luas"), Some(HeaderMatch::Field(Field::LandArea)));
        assert_eq!(
            classify_header("Luas Tanah (m2)"),
            Some(HeaderMatch::Field(Field::LandArea))
        );
        assert_eq!(
            classify_header("Luas Bangunan"),
            Some(HeaderMatch::Field(Field::BuildingArea))
        );
        assert_eq!(classify_header("Nama"), Some(HeaderMatch::WeakName));
        assert_eq!(classify_header("Keterangan"), None);
        assert_eq!(classify_header("   "), None);
    }

    // -- ColumnMap tests --

    #[test]
    fn test_weak_name_yields_to_explicit_debtor_column() {
        let map = ColumnMap::from_header(&row(&["Nama", "Nama Debitur"]));
        assert_eq!(map.borrower_name, Some(1));

        let map = ColumnMap::from_header(&row(&["Nama Debitur", "Nama"]));
        assert_eq!(map.borrower_name, Some(0));
    }

    #[test]
    fn test_building_area_defaults_right_of_land() {
        let map = ColumnMap::from_header(&row(&["Nama Debitur", "Luas", "", "Kota"]));
        assert_eq!(map.land_area, Some(1));
        assert_eq!(map.building_area, Some(2));
    }

    #[test]
    fn test_explicit_building_area_kept() {
        let map = ColumnMap::from_header(&row(&["Luas Tanah", "Kota", "Luas Bangunan"]));
        assert_eq!(map.building_area, Some(2));
    }

    #[test]
    fn test_locate_table_splits_header_and_rows() {
        let grid = vec![
            row(&["Nama Debitur", "Nomor Laporan", "Tanggal Penilaian", "Nilai Obyek"]),
            row(&["Budi", "LAP001", "2024-01-10", "500"]),
        ];
        let table = locate_table(&grid).unwrap();
        assert_eq!(table.header_index, 0);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.columns.get(Field::ReportNumber), Some(1));
        assert_eq!(table.columns.get(Field::ObjectValue), Some(3));
    }
}
