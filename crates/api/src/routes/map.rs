use axum::routing::get;
use axum::Router;

use crate::handlers::map;
use crate::state::AppState;

/// Routes mounted at `/map`.
///
/// ```text
/// GET /locations  -> list_locations
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/locations", get(map::list_locations))
}
