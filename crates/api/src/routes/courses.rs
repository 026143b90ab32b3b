//! Route definitions for courses, steps, enrollment, and the lesson
//! completion marker.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{courses, learning, steps};
use crate::state::AppState;

/// Routes for the course catalog, authoring, and consumption flow.
///
/// ```text
/// GET    /courses                          -> list_courses
/// POST   /courses                          -> create_course
/// GET    /courses/{id}                     -> get_course
/// PUT    /courses/{id}                     -> update_course
/// DELETE /courses/{id}                     -> delete_course
/// POST   /courses/{id}/enroll              -> enroll
/// DELETE /courses/{id}/enroll              -> unenroll
/// GET    /courses/{id}/steps               -> list_steps (learner view)
/// POST   /courses/{id}/steps               -> create_step
/// GET    /courses/{id}/steps/{module_id}   -> get_step (editor view)
/// PUT    /courses/{id}/steps/{module_id}   -> update_step
/// DELETE /courses/{id}/steps/{module_id}   -> delete_step
/// POST   /lessons/{id}/complete            -> complete_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/courses/{id}/enroll",
            post(courses::enroll).delete(courses::unenroll),
        )
        .route(
            "/courses/{id}/steps",
            get(learning::list_steps).post(steps::create_step),
        )
        .route(
            "/courses/{id}/steps/{module_id}",
            get(steps::get_step)
                .put(steps::update_step)
                .delete(steps::delete_step),
        )
        .route("/lessons/{id}/complete", post(learning::complete_lesson))
}
