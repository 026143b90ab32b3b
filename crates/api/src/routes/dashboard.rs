//! Route definitions for the role dashboards.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /admin     -> admin_dashboard
/// GET /faculty   -> faculty_dashboard
/// GET /student   -> student_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard::admin_dashboard))
        .route("/faculty", get(dashboard::faculty_dashboard))
        .route("/student", get(dashboard::student_dashboard))
}
