//! Handlers for admin user management: listing, profile edits, role
//! changes, and deactivation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use stepwise_core::error::CoreError;
use stepwise_core::roles::validate_role;
use stepwise_core::types::DbId;
use stepwise_db::models::profile::UpdateProfile;
use stepwise_db::models::user::{UpdateUser, UserResponse};
use stepwise_db::repositories::{ProfileRepo, RoleRepo, SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Profile fields applied alongside the account flags.
    #[serde(flatten)]
    pub profile: UpdateProfile,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Load a user or return NotFound.
async fn ensure_user_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<stepwise_db::models::user::User> {
    UserRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "User", id }))
}

/// GET /api/v1/admin/users
///
/// Every user with role name and profile fields, newest first.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list_with_profiles(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update a user's active flag and profile fields.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdminUpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let user = ensure_user_exists(&state.pool, id).await?;

    if let Some(is_active) = input.is_active {
        UserRepo::update(
            &state.pool,
            id,
            &UpdateUser {
                username: None,
                email: None,
                role_id: None,
                is_active: Some(is_active),
            },
        )
        .await?;

        // Deactivation also ends the user's sessions.
        if !is_active {
            SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        }
    }

    // Profile rows are created lazily for accounts that predate them.
    if ProfileRepo::find_by_user(&state.pool, id).await?.is_none() {
        ProfileRepo::create_empty(&state.pool, id).await?;
    }
    let profile = ProfileRepo::update(&state.pool, id, &input.profile).await?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        "User updated by admin",
    );

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let updated = ensure_user_exists(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({
            "user": UserResponse {
                id: updated.id,
                username: updated.username,
                email: updated.email,
                role,
                role_id: updated.role_id,
                is_active: updated.is_active,
                last_login_at: updated.last_login_at,
                created_at: updated.created_at,
            },
            "profile": profile,
        }),
    }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's role. The role name must be one of the seeded roles.
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_user_exists(&state.pool, id).await?;
    validate_role(&input.role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let role = RoleRepo::find_by_name(&state.pool, &input.role)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{}' is not seeded", input.role)))?;

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: None,
            email: None,
            role_id: Some(role.id),
            is_active: None,
        },
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    // Existing tokens still carry the old role claim; end those sessions
    // so the change takes effect on next login/refresh.
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(
        user_id = id,
        admin_id = admin.user_id,
        role = %input.role,
        "User role changed",
    );

    Ok(Json(DataResponse {
        data: UserResponse {
            id: updated.id,
            username: updated.username,
            email: updated.email,
            role: role.name,
            role_id: updated.role_id,
            is_active: updated.is_active,
            last_login_at: updated.last_login_at,
            created_at: updated.created_at,
        },
    }))
}
