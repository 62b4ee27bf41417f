//! Route definitions for the `/records` resource.

use std::time::Duration;

use axum::routing::{delete, get};
use axum::Router;

use super::request_timeout;
use crate::handlers::records;
use crate::state::AppState;

/// Routes mounted at `/records`.
///
/// ```text
/// GET    /       -> list_records
/// POST   /       -> create_record
/// DELETE /       -> purge_records (admin, no timeout)
/// GET    /{id}   -> get_record
/// PUT    /{id}   -> update_record (admin)
/// DELETE /{id}   -> delete_record (admin)
/// ```
pub fn router(timeout: Duration) -> Router<AppState> {
    Router::new()
        .route("/", get(records::list_records).post(records::create_record))
        .route(
            "/{id}",
            get(records::get_record)
                .put(records::update_record)
                .delete(records::delete_record),
        )
        .route_layer(request_timeout(timeout))
        .route("/", delete(records::purge_records))
}
