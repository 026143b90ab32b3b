//! Route definitions for quiz authoring and attempts.

use axum::routing::get;
use axum::Router;

use crate::handlers::{learning, quizzes};
use crate::state::AppState;

/// Routes for quizzes.
///
/// ```text
/// GET    /quizzes                 -> list_quizzes (author scope)
/// GET    /quizzes/{id}            -> get_quiz (author view)
/// PUT    /quizzes/{id}            -> update_quiz
/// DELETE /quizzes/{id}            -> delete_quiz
/// GET    /quizzes/{id}/attempts   -> list_attempts (own history)
/// POST   /quizzes/{id}/attempts   -> submit_attempt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(quizzes::list_quizzes))
        .route(
            "/quizzes/{id}",
            get(quizzes::get_quiz)
                .put(quizzes::update_quiz)
                .delete(quizzes::delete_quiz),
        )
        .route(
            "/quizzes/{id}/attempts",
            get(learning::list_attempts).post(learning::submit_attempt),
        )
}
