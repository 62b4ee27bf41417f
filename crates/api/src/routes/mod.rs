pub mod auth;
pub mod health;
pub mod import;
pub mod map;
pub mod records;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;

/// Per-request timeout for ordinary routes, answering 408 when it fires.
pub fn request_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                 login (public)
/// /auth/me                    current user (requires auth)
///
/// /records                    list, create, reset database (admin)
/// /records/{id}               detail, update (admin), delete (admin)
///
/// /import                     spreadsheet upload (requires auth)
///
/// /map/locations              plottable records (requires auth)
/// ```
///
/// Every route except the upload and the database reset is bounded by
/// `timeout`. Those two run until the record store has answered every
/// call, so their report always reaches the client.
pub fn api_routes(timeout: Duration) -> Router<AppState> {
    Router::new()
        // Authentication (login, current user).
        .nest("/auth", auth::router())
        // Map view.
        .nest("/map", map::router())
        .route_layer(request_timeout(timeout))
        // Appraisal records; the bulk reset is left unbounded.
        .nest("/records", records::router(timeout))
        // Spreadsheet ingestion.
        .nest("/import", import::router())
}
