//! Outcome reports for ingestion and purge runs.

use serde::Serialize;

/// Whether a sheet contributed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetStatus {
    /// At least one row was created or recognised as a duplicate.
    Imported,
    /// No header was found or no row survived normalisation.
    Empty,
}

/// Counters for one sheet of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub file: String,
    pub sheet: String,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SheetReport {
    pub fn new(file: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sheet: sheet.into(),
            created: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn status(&self) -> SheetStatus {
        if self.created > 0 || self.skipped > 0 {
            SheetStatus::Imported
        } else {
            SheetStatus::Empty
        }
    }

    /// One human-readable status line.
    pub fn log_line(&self) -> String {
        match self.status() {
            SheetStatus::Imported if self.failed > 0 => format!(
                "{} [{}]: {} created, {} duplicates skipped, {} failed",
                self.file, self.sheet, self.created, self.skipped, self.failed
            ),
            SheetStatus::Imported => format!(
                "{} [{}]: {} created, {} duplicates skipped",
                self.file, self.sheet, self.created, self.skipped
            ),
            SheetStatus::Empty if self.failed > 0 => format!(
                "{} [{}]: nothing imported, {} failed",
                self.file, self.sheet, self.failed
            ),
            SheetStatus::Empty => format!("{} [{}]: no data found", self.file, self.sheet),
        }
    }
}

/// A file that could not be decoded as a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

/// Aggregated result of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub sheets: Vec<SheetReport>,
    pub failures: Vec<FileFailure>,
    pub total_created: usize,
    pub total_skipped: usize,
    pub total_failed: usize,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sheet(&mut self, sheet: SheetReport) {
        self.total_created += sheet.created;
        self.total_skipped += sheet.skipped;
        self.total_failed += sheet.failed;
        self.sheets.push(sheet);
    }

    pub fn record_failure(&mut self, file: impl Into<String>, message: impl Into<String>) {
        self.failures.push(FileFailure {
            file: file.into(),
            message: message.into(),
        });
    }

    /// Status lines in processing order, file failures last.
    pub fn log_lines(&self) -> Vec<String> {
        self.sheets
            .iter()
            .map(SheetReport::log_line)
            .chain(
                self.failures
                    .iter()
                    .map(|f| format!("{}: could not be read ({})", f.file, f.message)),
            )
            .collect()
    }
}

/// Result of a delete-all run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    /// Records deleted.
    pub deleted: usize,
    /// Listing rounds that returned identifiers.
    pub batches: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(created: usize, skipped: usize, failed: usize) -> SheetReport {
        SheetReport {
            created,
            skipped,
            failed,
            ..SheetReport::new("data.xlsx", "Sheet1")
        }
    }

    #[test]
    fn test_status_follows_counts() {
        assert_eq!(sheet(0, 0, 0).status(), SheetStatus::Empty);
        assert_eq!(sheet(0, 0, 2).status(), SheetStatus::Empty);
        assert_eq!(sheet(0, 1, 0).status(), SheetStatus::Imported);
        assert_eq!(sheet(3, 0, 0).status(), SheetStatus::Imported);
    }

    #[test]
    fn test_totals_accumulate() {
        let mut summary = ImportSummary::new();
        summary.record_sheet(sheet(2, 1, 0));
        summary.record_sheet(sheet(3, 0, 1));
        summary.record_failure("broken.xlsx", "not a zip archive");
        assert_eq!(summary.total_created, 5);
        assert_eq!(summary.total_skipped, 1);
        assert_eq!(summary.total_failed, 1);
        assert_eq!(summary.failures.len(), 1);
    }

    #[test]
    fn test_log_lines() {
        let mut summary = ImportSummary::new();
        summary.record_sheet(sheet(2, 1, 0));
        summary.record_sheet(sheet(0, 0, 0));
        summary.record_failure("broken.xlsx", "bad");
        assert_eq!(
            summary.log_lines(),
            vec![
                "data.xlsx [Sheet1]: 2 created, 1 duplicates skipped".to_string(),
                "data.xlsx [Sheet1]: no data found".to_string(),
                "broken.xlsx: could not be read (bad)".to_string(),
            ]
        );
    }
}
