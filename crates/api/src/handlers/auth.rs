//! Handlers for the `/auth` resource (login, current user).

use appraisal_core::error::CoreError;
use appraisal_core::roles::DEFAULT_ROLE_LABEL;
use appraisal_core::types::RecordId;
use appraisal_store::StoreError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token to send as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: UserInfo,
}

/// Public user info.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: RecordId,
    pub email: String,
    /// Role name, or the default label for accounts without one.
    pub role: String,
    /// Whether edit, delete and reset controls should be offered.
    pub is_admin: bool,
}

impl From<&AuthUser> for UserInfo {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.user_id.clone(),
            email: user.email.clone(),
            role: user
                .role
                .clone()
                .unwrap_or_else(|| DEFAULT_ROLE_LABEL.to_string()),
            is_admin: user.is_admin(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password against the record store's user
/// collection. Returns the store-issued session token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    let session = state
        .store
        .authenticate(&input.email, &input.password)
        .await
        .map_err(|e| match e {
            StoreError::Unauthorized => AppError::Core(CoreError::Unauthorized(
                "Invalid email or password".into(),
            )),
            other => AppError::Store(other),
        })?;

    let user = AuthUser {
        role: session.user.role().map(str::to_string),
        user_id: session.user.id,
        email: session.user.email,
    };
    tracing::info!(user_id = %user.user_id, admin = user.is_admin(), "User logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        user: UserInfo::from(&user),
    }))
}

/// GET /api/v1/auth/me
///
/// Return the user behind the current session token.
pub async fn me(user: AuthUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse {
        data: UserInfo::from(&user),
    })
}
