use appraisal_store::StoreError;

/// Failures that stop an ingestion or purge run as a whole.
///
/// Per-file read failures and per-row persistence failures are not
/// errors at this level; they are counted in the run's report.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The existing records could not be fetched, so duplicates cannot be
    /// detected. Nothing has been persisted when this is returned.
    #[error("Could not load existing records: {0}")]
    ExistingRecords(#[source] StoreError),

    #[error("Purge stopped after deleting {deleted} records: {source}")]
    Purge {
        deleted: usize,
        #[source]
        source: StoreError,
    },
}
