//! Handlers for the `/records` resource.
//!
//! Browsing, search and detail are open to any signed-in user; editing,
//! deleting and the database reset require the admin role.

use appraisal_core::coordinate;
use appraisal_core::query::{self, SortOrder, BROWSE_PAGE_SIZE, COMPARATOR_LIMIT};
use appraisal_core::record::{PropertyRecord, StoredRecord};
use appraisal_core::report::PurgeReport;
use appraisal_store::{ListQuery, RecordPage, RecordStore};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /records`.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsParams {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Case-insensitive substring over name, city, address and branch.
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// A record together with its comparators and map link.
#[derive(Debug, Serialize)]
pub struct RecordDetail {
    pub record: StoredRecord,
    pub comparators: Vec<StoredRecord>,
    pub maps_link: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/records?page=&search=&sort=
///
/// One page of debtor records. Comparator assets never appear here; they
/// are shown on the detail of the debtor they belong to.
pub async fn list_records(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListRecordsParams>,
) -> AppResult<Json<DataResponse<RecordPage>>> {
    let page = params.page.unwrap_or(1).max(1);
    let term = params.search.as_deref().unwrap_or("");
    let list_query = ListQuery::new()
        .filter(query::browse_filter(term))
        .sort(params.sort);

    let records = state.store.list(page, BROWSE_PAGE_SIZE, &list_query).await?;

    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/records/{id}
///
/// A single record with up to ten comparators from the same report,
/// highest value first.
pub async fn get_record(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<RecordDetail>>> {
    let record = state.store.get(&id).await?;
    let comparators = comparators_of(state.store.as_ref(), &record).await?;
    let maps_link = coordinate::maps_link(&record.record.coordinate);

    Ok(Json(DataResponse {
        data: RecordDetail {
            record,
            comparators,
            maps_link,
        },
    }))
}

/// POST /api/v1/records
///
/// Create a single record by hand.
pub async fn create_record(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<PropertyRecord>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let record = state.store.create(&input).await?;

    tracing::info!(
        record_id = %record.id,
        report_number = %record.record.report_number,
        user_id = %user.user_id,
        "Record created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PUT /api/v1/records/{id}
///
/// Replace the editable fields of a record.
pub async fn update_record(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PropertyRecord>,
) -> AppResult<Json<DataResponse<StoredRecord>>> {
    input.validate()?;

    let record = state.store.update(&id, &input).await?;

    tracing::info!(record_id = %id, user_id = %admin.user_id, "Record updated");

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/records/{id}
pub async fn delete_record(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.store.delete(&id).await?;

    tracing::info!(record_id = %id, user_id = %admin.user_id, "Record deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/records
///
/// Reset the database: delete every record in batches. A failure stops the
/// run and reports how many records were already gone.
pub async fn purge_records(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PurgeReport>>> {
    tracing::warn!(user_id = %admin.user_id, "Database reset requested");

    let report = appraisal_ingest::purge_all(state.store.as_ref()).await?;

    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Records sharing `record`'s report number, excluding itself.
async fn comparators_of(
    store: &dyn RecordStore,
    record: &StoredRecord,
) -> AppResult<Vec<StoredRecord>> {
    let Some(filter) = query::comparators_filter(&record.record.report_number, &record.id) else {
        return Ok(Vec::new());
    };
    let list_query = ListQuery::new().filter(filter).sort(SortOrder::ValueDesc);
    let page = store.list(1, COMPARATOR_LIMIT, &list_query).await?;
    Ok(page.items)
}
