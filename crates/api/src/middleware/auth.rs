//! Session-token authentication extractor for Axum handlers.

use appraisal_core::error::CoreError;
use appraisal_core::roles;
use appraisal_core::types::RecordId;
use appraisal_store::StoreError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the `Authorization: Bearer <token>` header.
///
/// Tokens are issued by the record store at login and verified by asking
/// the store to refresh them, so a revoked or expired session is rejected
/// on the next request.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's record id in the auth collection.
    pub user_id: RecordId,
    pub email: String,
    /// The user's role name, if the account has one (e.g. `"admin"`).
    pub role: Option<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        roles::is_admin(self.role.as_deref())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let session = state.store.refresh(token).await.map_err(|e| match e {
            StoreError::Unauthorized => {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            }
            other => AppError::Store(other),
        })?;

        let role = session.user.role().map(str::to_string);
        Ok(AuthUser {
            user_id: session.user.id,
            email: session.user.email,
            role,
        })
    }
}
