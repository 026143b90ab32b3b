//! Repository for the `modules` table.

use sqlx::PgPool;
use stepwise_core::types::DbId;

use crate::models::module::{CreateModule, Module, UpdateModule};

/// Column list for `modules` queries.
const COLUMNS: &str = "id, course_id, title, description, position, created_at, updated_at";

/// Provides CRUD operations for course modules (steps).
pub struct ModuleRepo;

impl ModuleRepo {
    /// Insert a new module, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateModule) -> Result<Module, sqlx::Error> {
        let query = format!(
            "INSERT INTO modules (course_id, title, description, position)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(input.course_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    /// Find a module by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Module>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modules WHERE id = $1");
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a course's modules in step order.
    pub async fn list_by_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Module>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM modules WHERE course_id = $1 ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Count a course's modules. New steps are appended at this position.
    pub async fn count_by_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    /// Update a module. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateModule,
    ) -> Result<Option<Module>, sqlx::Error> {
        let query = format!(
            "UPDATE modules SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                position = COALESCE($4, position)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Module>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.position)
            .fetch_optional(pool)
            .await
    }

    /// Delete a module. Its lesson and quiz cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
