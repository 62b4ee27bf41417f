//! Handler for spreadsheet uploads.

use appraisal_core::report::ImportSummary;
use appraisal_ingest::UploadedFile;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of an upload: the per-sheet counts and one status line per
/// sheet or unreadable file, ready to show to the user.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub summary: ImportSummary,
    pub log: Vec<String>,
}

/// POST /api/v1/import
///
/// Accept one or more spreadsheets as multipart file fields and import
/// them in upload order. Fields without a file name are ignored.
pub async fn import_spreadsheets(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportResult>>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        files.push(UploadedFile::new(filename, data.to_vec()));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(
            "No files received in multipart upload".to_string(),
        ));
    }

    tracing::info!(user_id = %user.user_id, files = files.len(), "Spreadsheet upload received");

    let summary = appraisal_ingest::import_files(state.store.as_ref(), files).await?;
    let log = summary.log_lines();

    Ok(Json(DataResponse {
        data: ImportResult { summary, log },
    }))
}
