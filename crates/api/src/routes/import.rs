//! Route definitions for spreadsheet import.

use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
///
/// ```text
/// POST /  -> import_spreadsheets (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(import::import_spreadsheets))
}
