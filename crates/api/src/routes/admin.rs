//! Route definitions for site administration. Every handler behind this
//! router requires the admin role.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{admin_users, dashboard, settings};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET /users              -> list_users
/// PUT /users/{id}         -> update_user
/// PUT /users/{id}/role    -> set_role
/// GET /settings           -> get_settings
/// PUT /settings           -> update_settings
/// GET /analytics          -> admin_analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin_users::list_users))
        .route("/users/{id}", put(admin_users::update_user))
        .route("/users/{id}/role", put(admin_users::set_role))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/analytics", get(dashboard::admin_analytics))
}
