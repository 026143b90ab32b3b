//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use stepwise_core::error::CoreError;
use stepwise_db::models::profile::UpdateProfile;
use stepwise_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
///
/// The caller's profile row.
pub async fn get_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                id: user.user_id,
            })
        })?;

    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Update the caller's profile. Only posted fields change.
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    // Profile rows are created lazily for accounts that predate them.
    if ProfileRepo::find_by_user(&state.pool, user.user_id).await?.is_none() {
        ProfileRepo::create_empty(&state.pool, user.user_id).await?;
    }

    let profile = ProfileRepo::update(&state.pool, user.user_id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                id: user.user_id,
            })
        })?;

    tracing::info!(user_id = user.user_id, "Profile updated");

    Ok(Json(DataResponse { data: profile }))
}
