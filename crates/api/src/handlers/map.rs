//! Handler for the map view.

use appraisal_core::coordinate::{self, GeoPoint};
use appraisal_core::query::SortOrder;
use appraisal_core::record::StoredRecord;
use appraisal_core::types::RecordId;
use appraisal_store::ListQuery;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// A record that can be plotted.
#[derive(Debug, Serialize)]
pub struct MapLocation {
    pub id: RecordId,
    pub borrower: String,
    pub report_number: String,
    pub object_value: f64,
    /// The coordinate as typed.
    pub coordinate: String,
    #[serde(flatten)]
    pub point: GeoPoint,
    pub maps_link: Option<String>,
}

impl MapLocation {
    /// `None` when the record's coordinate is missing or unparseable.
    fn from_record(stored: StoredRecord) -> Option<Self> {
        let record = stored.record;
        if !coordinate::is_mappable(&record.coordinate) {
            return None;
        }
        let point = coordinate::parse_coordinate(&record.coordinate)?;
        Some(Self {
            id: stored.id,
            borrower: record.borrower.display_name().to_string(),
            report_number: record.report_number,
            object_value: record.object_value,
            maps_link: coordinate::maps_link(&record.coordinate),
            coordinate: record.coordinate,
            point,
        })
    }
}

/// GET /api/v1/map/locations
///
/// Every record with a usable coordinate, newest first.
pub async fn list_locations(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MapLocation>>>> {
    let query = ListQuery::new().sort(SortOrder::Newest);
    let records = state.store.full_list(&query).await?;

    let total = records.len();
    let locations: Vec<MapLocation> = records
        .into_iter()
        .filter_map(MapLocation::from_record)
        .collect();
    tracing::debug!(total, mapped = locations.len(), "Map locations resolved");

    Ok(Json(DataResponse { data: locations }))
}
