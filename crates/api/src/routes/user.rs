//! Route definitions for the caller's own profile and notifications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{notifications, profile};
use crate::state::AppState;

/// Routes for per-user resources.
///
/// ```text
/// GET  /profile                    -> get_profile
/// PUT  /profile                    -> update_profile
/// GET  /notifications              -> list_notifications
/// POST /notifications/{id}/read    -> mark_read
/// POST /notifications/read-all     -> mark_all_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
}
