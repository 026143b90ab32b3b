//! Handler for media uploads (avatars, course thumbnails, lesson videos).
//!
//! Files are opaque blobs: stored under `MEDIA_DIR` with a UUID-prefixed
//! name and served back at `/media/<name>` by the static-file layer. No
//! processing happens here.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::settings::load_settings;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a stored upload.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    /// Public path the file is served from.
    pub url: String,
    pub filename: String,
    pub size_bytes: usize,
}

/// Strip any path components and keep a safe basename.
fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect()
}

/// POST /api/v1/media
///
/// Accept a single-file multipart upload, bounded by the
/// `max_file_upload_size` site setting, and return its public URL.
pub async fn upload(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResult>>)> {
    let settings = load_settings(&state.pool).await?;
    let max_bytes = settings.max_file_upload_size as usize * 1024 * 1024;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .ok_or_else(|| AppError::BadRequest("No file received in multipart upload".into()))?;

    let original_name = sanitize_filename(field.file_name().unwrap_or("upload"));
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if data.len() > max_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {} MB upload limit",
            settings.max_file_upload_size
        )));
    }

    let stored_name = format!("{}-{}", Uuid::new_v4(), original_name);
    let dir = std::path::Path::new(&state.config.media_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create media dir: {e}")))?;
    tokio::fs::write(dir.join(&stored_name), &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    tracing::info!(
        user_id = user.user_id,
        filename = %stored_name,
        size_bytes = data.len(),
        "Media uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResult {
                url: format!("/media/{stored_name}"),
                filename: stored_name,
                size_bytes: data.len(),
            },
        }),
    ))
}
