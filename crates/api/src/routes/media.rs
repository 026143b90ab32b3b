//! Route definitions for media uploads.

use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// POST /   -> upload
/// ```
///
/// Stored files are served back at the root-level `/media` static route;
/// see `router::build_app_router`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(media::upload))
}
