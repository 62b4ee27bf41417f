//! Delete every record ("reset database").

use appraisal_core::query::PURGE_BATCH_SIZE;
use appraisal_core::record::fields;
use appraisal_core::report::PurgeReport;
use appraisal_store::{ListQuery, RecordStore, StoreError};
use futures::future::join_all;

use crate::error::IngestError;

/// Delete records in rounds until a listing comes back empty.
///
/// Each round fetches up to [`PURGE_BATCH_SIZE`] identifiers and deletes
/// them concurrently, waiting for the whole round before listing again.
/// The first failed round ends the run; the error reports how many
/// records were deleted up to and including that round.
pub async fn purge_all<S>(store: &S) -> Result<PurgeReport, IngestError>
where
    S: RecordStore + ?Sized,
{
    let query = ListQuery::new().fields(&[fields::ID]);
    let mut report = PurgeReport::default();

    loop {
        let page = store
            .list(1, PURGE_BATCH_SIZE, &query)
            .await
            .map_err(|source| IngestError::Purge {
                deleted: report.deleted,
                source,
            })?;
        if page.items.is_empty() {
            break;
        }

        let results = join_all(page.items.iter().map(|r| store.delete(&r.id))).await;
        let mut first_error: Option<StoreError> = None;
        for result in results {
            match result {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        report.batches += 1;

        if let Some(source) = first_error {
            tracing::error!(deleted = report.deleted, error = %source, "Purge aborted");
            return Err(IngestError::Purge {
                deleted: report.deleted,
                source,
            });
        }
        tracing::debug!(deleted = report.deleted, batch = report.batches, "Purge batch done");
    }

    tracing::info!(deleted = report.deleted, batches = report.batches, "Purge finished");
    Ok(report)
}
