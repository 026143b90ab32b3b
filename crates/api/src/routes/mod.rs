//! Route definitions.

pub mod admin;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod health;
pub mod media;
pub mod quizzes;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/refresh                       refresh (public)
/// /auth/logout                        logout (requires auth)
/// /auth/me                            current user + profile + role
///
/// /courses                            list (role-scoped), create
/// /courses/{id}                       get, update, delete
/// /courses/{id}/enroll                enroll (POST), unenroll (DELETE)
/// /courses/{id}/steps                 learner step list (GET), create step (POST)
/// /courses/{id}/steps/{module_id}     editor bundle (GET), update (PUT), delete
///
/// /lessons/{id}/complete              mark quiz-less step complete (POST)
///
/// /quizzes                            author's quizzes (GET)
/// /quizzes/{id}                       author view (GET), update (PUT), delete
/// /quizzes/{id}/attempts              submit (POST), own history (GET)
///
/// /dashboard/admin                    admin counts
/// /dashboard/faculty                  faculty counts
/// /dashboard/student                  enrollments with progress
///
/// /profile                            own profile (GET, PUT)
/// /notifications                      list (GET)
/// /notifications/{id}/read            mark read (POST)
/// /notifications/read-all             mark all read (POST)
///
/// /admin/users                        list (admin only)
/// /admin/users/{id}                   update flags + profile (PUT)
/// /admin/users/{id}/role              change role (PUT)
/// /admin/settings                     typed settings (GET, PUT)
/// /admin/analytics                    analytics payload (GET)
///
/// /media                              multipart upload (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(courses::router())
        .merge(quizzes::router())
        .nest("/dashboard", dashboard::router())
        .merge(user::router())
        .nest("/admin", admin::router())
        .nest("/media", media::router())
}
