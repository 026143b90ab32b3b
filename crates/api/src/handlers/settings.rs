//! Handlers for the admin site-settings page.
//!
//! Settings live as one JSONB value per key and are edited as the typed
//! [`SiteSettings`] struct; unknown keys in the table are preserved.

use axum::extract::State;
use axum::Json;
use stepwise_core::error::CoreError;
use stepwise_core::roles::validate_role;
use stepwise_core::settings::SiteSettings;
use stepwise_db::repositories::SiteSettingRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load the typed settings view from the key/value rows.
pub async fn load_settings(pool: &sqlx::PgPool) -> AppResult<SiteSettings> {
    let rows = SiteSettingRepo::list(pool).await?;
    Ok(SiteSettings::from_rows(
        rows.iter()
            .filter_map(|r| r.value.as_ref().map(|v| (r.key.as_str(), v))),
    ))
}

/// GET /api/v1/admin/settings
///
/// The typed settings struct, defaults applied for missing keys.
pub async fn get_settings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SiteSettings>>> {
    let settings = load_settings(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Persist the full settings struct as key/value rows in one transaction.
pub async fn update_settings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SiteSettings>,
) -> AppResult<Json<DataResponse<SiteSettings>>> {
    validate_role(&input.default_user_role)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    if input.max_file_upload_size <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "max_file_upload_size must be positive".into(),
        )));
    }

    SiteSettingRepo::upsert_many(&state.pool, &input.to_rows()).await?;

    tracing::info!(admin_id = admin.user_id, "Site settings updated");

    let settings = load_settings(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}
