//! Repository for the `lessons` table.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::lesson::{Lesson, UpsertLesson};

/// Column list for `lessons` queries.
const COLUMNS: &str = "id, module_id, title, content, content_type, media_url, \
                        duration_seconds, position, created_at, updated_at";

/// Provides operations for module lessons.
pub struct LessonRepo;

impl LessonRepo {
    /// Find a lesson by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a module's lesson, if one exists.
    pub async fn find_by_module(
        pool: &PgPool,
        module_id: DbId,
    ) -> Result<Option<Lesson>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lessons WHERE module_id = $1");
        sqlx::query_as::<_, Lesson>(&query)
            .bind(module_id)
            .fetch_optional(pool)
            .await
    }

    /// List lessons for a set of modules.
    pub async fn list_by_modules(
        pool: &PgPool,
        module_ids: &[DbId],
    ) -> Result<Vec<Lesson>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lessons WHERE module_id = ANY($1) ORDER BY module_id"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(module_ids)
            .fetch_all(pool)
            .await
    }

    /// Create or update a module's single lesson.
    ///
    /// `uq_lessons_module` makes this a true upsert: one row per module,
    /// ever.
    pub async fn upsert_for_module(
        pool: &PgPool,
        module_id: DbId,
        input: &UpsertLesson,
    ) -> Result<Lesson, sqlx::Error> {
        let query = format!(
            "INSERT INTO lessons (module_id, title, content, media_url, duration_seconds)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (module_id) DO UPDATE
             SET title = EXCLUDED.title,
                 content = EXCLUDED.content,
                 media_url = EXCLUDED.media_url,
                 duration_seconds = EXCLUDED.duration_seconds
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lesson>(&query)
            .bind(module_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.media_url)
            .bind(input.duration_seconds)
            .fetch_one(pool)
            .await
    }
}
