//! Row normalisation ("smart fill").
//!
//! Workbooks are authored with merged cells: a report number or appraisal
//! date is written once and left blank on the rows below it. Rows are
//! folded in sheet order through a [`FillState`] that carries the last seen
//! values forward. Each step takes the state by value and returns the next
//! one, so a row can be normalised in isolation given the state before it.

use chrono::NaiveDate;

use crate::cell::{cell_at, is_blank_row, CellValue};
use crate::coordinate::find_coordinate;
use crate::date::parse_cell_date;
use crate::duplicate::DuplicateKey;
use crate::header::{ColumnMap, Field};
use crate::record::{has_report_number, Borrower, PropertyRecord, PLACEHOLDER};

/// Header text that sometimes leaks into the data region (repeated headers
/// on printed pages).
const HEADER_LEAK: &str = "nama debitur";

/// Values carried from one row to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct FillState {
    pub report_number: String,
    pub appraisal_date: Option<NaiveDate>,
}

impl Default for FillState {
    fn default() -> Self {
        Self {
            report_number: PLACEHOLDER.to_string(),
            appraisal_date: None,
        }
    }
}

/// A normalised row ready for the duplicate check.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub key: DuplicateKey,
    pub record: PropertyRecord,
}

/// What became of one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Every cell was blank. The carried state is untouched.
    Blank,
    /// No usable borrower and nothing to salvage as a comparator.
    Discarded,
    /// A record to persist unless its key is already known.
    Candidate(Box<CandidateRow>),
}

impl RowOutcome {
    pub fn into_candidate(self) -> Option<CandidateRow> {
        match self {
            Self::Candidate(candidate) => Some(*candidate),
            Self::Blank | Self::Discarded => None,
        }
    }
}

/// Normalise one data row given the state left by the rows above it.
pub fn normalize_row(
    mut state: FillState,
    row: &[CellValue],
    columns: &ColumnMap,
) -> (FillState, RowOutcome) {
    if is_blank_row(row) {
        return (state, RowOutcome::Blank);
    }

    let cell = |field: Field| cell_at(row, columns.get(field));

    if let Some(report) = cell(Field::ReportNumber).filter(|c| !c.is_blank()) {
        let report = report.to_text();
        if report != PLACEHOLDER {
            state.report_number = report;
        }
    }

    if let Some(date_cell) = cell(Field::AppraisalDate).filter(|c| !c.is_blank()) {
        state.appraisal_date = parse_cell_date(date_cell);
    }

    let name = cell(Field::BorrowerName)
        .map(CellValue::to_text)
        .unwrap_or_default();
    let number = |field: Field| cell(field).map_or(0.0, CellValue::to_number);
    let object_value = number(Field::ObjectValue);
    let land_area = number(Field::LandArea);

    let borrower = if name.is_empty() || name.to_lowercase().contains(HEADER_LEAK) {
        let has_data = object_value > 0.0 || land_area > 0.0;
        if !(has_data && has_report_number(&state.report_number)) {
            return (state, RowOutcome::Discarded);
        }
        Borrower::Comparator
    } else {
        Borrower::Debtor(name)
    };

    let key = DuplicateKey::new(
        &state.report_number,
        borrower.display_name(),
        land_area,
        object_value,
    );

    let text = |field: Field| {
        let value = cell(field).map(CellValue::to_text).unwrap_or_default();
        if value.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            value
        }
    };

    let record = PropertyRecord {
        borrower,
        city: text(Field::City),
        address: text(Field::Address),
        object_value,
        appraisal_date: state.appraisal_date,
        report_number: state.report_number.clone(),
        client: text(Field::Client),
        branch: text(Field::Branch),
        land_area,
        building_area: number(Field::BuildingArea),
        legal_status: text(Field::LegalStatus),
        appraiser: text(Field::Appraiser),
        coordinate: find_coordinate(row)
            .map(str::to_string)
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        offer_value: number(Field::OfferValue),
    };

    (
        state,
        RowOutcome::Candidate(Box::new(CandidateRow { key, record })),
    )
}

/// Normalise a run of data rows from a fresh state, returning the outcome
/// of each row in order.
pub fn normalize_rows(rows: &[Vec<CellValue>], columns: &ColumnMap) -> Vec<RowOutcome> {
    rows.iter()
        .scan(FillState::default(), |state, row| {
            let (next, outcome) = normalize_row(std::mem::take(state), row, columns);
            *state = next;
            Some(outcome)
        })
        .collect()
}
