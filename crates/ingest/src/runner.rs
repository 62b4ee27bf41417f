//! The ingestion run: files, then sheets, then rows, strictly in order.
//!
//! Existing duplicate keys are fetched once up front. Each sheet is folded
//! row by row through smart fill; candidates whose key is already known
//! are skipped, the rest are persisted one at a time and their keys added
//! to the set as they succeed.

use appraisal_core::duplicate::KeySet;
use appraisal_core::header::locate_table;
use appraisal_core::record::fields;
use appraisal_core::report::{ImportSummary, SheetReport};
use appraisal_core::smart_fill::{normalize_row, FillState};
use appraisal_store::{ListQuery, RecordStore};

use crate::error::IngestError;
use crate::reader::{read_workbook, SheetGrid};

/// A spreadsheet as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Load the duplicate keys of every persisted record.
pub async fn load_existing_keys<S>(store: &S) -> Result<KeySet, IngestError>
where
    S: RecordStore + ?Sized,
{
    let query = ListQuery::new().fields(fields::DUPLICATE_KEY_FIELDS);
    let existing = store
        .full_list(&query)
        .await
        .map_err(IngestError::ExistingRecords)?;
    Ok(KeySet::from_records(existing.iter().map(|r| &r.record)))
}

/// Import every sheet of every file.
///
/// Only a failure to load the existing keys aborts the run. Unreadable
/// files are reported and skipped; rows the store rejects are counted as
/// failed and the sheet carries on.
pub async fn import_files<S>(store: &S, files: Vec<UploadedFile>) -> Result<ImportSummary, IngestError>
where
    S: RecordStore + ?Sized,
{
    let mut keys = match load_existing_keys(store).await {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!(error = %e, "Import aborted");
            return Err(e);
        }
    };
    tracing::info!(files = files.len(), existing = keys.len(), "Import started");

    let mut summary = ImportSummary::new();
    for file in files {
        let name = file.name;
        let decoded = tokio::task::spawn_blocking(move || read_workbook(file.bytes)).await;
        let sheets = match decoded {
            Ok(Ok(sheets)) => sheets,
            Ok(Err(e)) => {
                tracing::warn!(file = %name, error = %e, "Skipping unreadable file");
                summary.record_failure(&name, e.to_string());
                continue;
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Spreadsheet decoding task failed");
                summary.record_failure(&name, format!("decoding task failed: {e}"));
                continue;
            }
        };

        for sheet in &sheets {
            let report = import_sheet(store, &name, sheet, &mut keys).await;
            tracing::info!(
                file = %report.file,
                sheet = %report.sheet,
                created = report.created,
                skipped = report.skipped,
                failed = report.failed,
                "Sheet imported"
            );
            summary.record_sheet(report);
        }
    }

    tracing::info!(
        created = summary.total_created,
        skipped = summary.total_skipped,
        failed = summary.total_failed,
        unreadable = summary.failures.len(),
        "Import finished"
    );
    Ok(summary)
}

/// Import one sheet. A sheet without a recognisable header yields an
/// empty report.
pub async fn import_sheet<S>(
    store: &S,
    file_name: &str,
    sheet: &SheetGrid,
    keys: &mut KeySet,
) -> SheetReport
where
    S: RecordStore + ?Sized,
{
    let mut report = SheetReport::new(file_name, &sheet.name);

    let Some(table) = locate_table(&sheet.rows) else {
        tracing::debug!(file = %file_name, sheet = %sheet.name, "No header row found");
        return report;
    };
    tracing::debug!(
        file = %file_name,
        sheet = %sheet.name,
        header_row = table.header_index,
        "Header row detected"
    );

    let mut state = FillState::default();
    for (offset, row) in table.rows.iter().enumerate() {
        let (next, outcome) = normalize_row(state, row, &table.columns);
        state = next;

        let Some(candidate) = outcome.into_candidate() else {
            continue;
        };
        if keys.contains(&candidate.key) {
            report.skipped += 1;
            continue;
        }

        match store.create(&candidate.record).await {
            Ok(_) => {
                keys.insert(candidate.key);
                report.created += 1;
            }
            Err(e) => {
                tracing::warn!(
                    file = %file_name,
                    sheet = %sheet.name,
                    row = table.header_index + offset + 2,
                    error = %e,
                    "Failed to persist row"
                );
                report.failed += 1;
            }
        }
    }
    report
}
