use appraisal_core::error::CoreError;
use appraisal_ingest::IngestError;
use appraisal_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, the record store and ingestion
/// errors, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `appraisal_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record store call failed.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// An ingestion or purge run stopped as a whole.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Record store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- Run-level failures ---
            AppError::Ingest(err) => {
                tracing::error!(error = %err, "Run aborted");
                match err {
                    IngestError::ExistingRecords(_) => (
                        StatusCode::BAD_GATEWAY,
                        "IMPORT_ABORTED",
                        "Import aborted: existing records could not be loaded".to_string(),
                    ),
                    IngestError::Purge { deleted, .. } => (
                        StatusCode::BAD_GATEWAY,
                        "PURGE_FAILED",
                        format!("Reset stopped after deleting {deleted} records"),
                    ),
                }
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a record store error into an HTTP status, error code, and message.
///
/// - `NotFound` maps to 404.
/// - `Unauthorized` (bad credentials, stale session) maps to 401.
/// - `Rejected` payloads map to 400.
/// - A 401/403 from the store on a record call maps to 403.
/// - Everything else maps to 502 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::NotFound { id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Record with id {id} not found"),
        ),
        StoreError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Invalid credentials or session".to_string(),
        ),
        StoreError::Rejected(body) => {
            tracing::warn!(body = %body, "Record store rejected payload");
            (
                StatusCode::BAD_REQUEST,
                "REJECTED",
                "The record was rejected by the record store".to_string(),
            )
        }
        StoreError::Api {
            status: 401 | 403, ..
        } => (
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "The record store refused the operation".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Record store error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The record store is unavailable".to_string(),
            )
        }
    }
}
