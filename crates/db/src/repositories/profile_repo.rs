//! Repository for the `profiles` table.

use sqlx::PgPool;
use stepwise_core::targeting::StudentAttributes;
use stepwise_core::types::DbId;

use crate::models::profile::{Profile, UpdateProfile};

/// Column list for `profiles` queries.
const COLUMNS: &str = "user_id, full_name, avatar_url, phone, regno, year, section, \
                        department, created_at, updated_at";

/// Provides CRUD operations for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert an empty profile row for a new user.
    pub async fn create_empty(pool: &PgPool, user_id: DbId) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by user id.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                avatar_url = COALESCE($3, avatar_url),
                phone = COALESCE($4, phone),
                regno = COALESCE($5, regno),
                year = COALESCE($6, year),
                section = COALESCE($7, section),
                department = COALESCE($8, department)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.full_name)
            .bind(&input.avatar_url)
            .bind(&input.phone)
            .bind(&input.regno)
            .bind(&input.year)
            .bind(&input.section)
            .bind(&input.department)
            .fetch_optional(pool)
            .await
    }

    /// Load targeting attributes for the given users, keyed by user id.
    ///
    /// Users without a profile row are returned with empty attributes so
    /// targeting treats them as matching nothing.
    pub async fn targeting_attributes(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<(DbId, StudentAttributes)>, sqlx::Error> {
        let rows: Vec<(DbId, Option<String>, Option<String>, Option<String>)> =
            sqlx::query_as(
                "SELECT u.id, p.year, p.section, p.department
                 FROM users u
                 LEFT JOIN profiles p ON p.user_id = u.id
                 WHERE u.id = ANY($1)",
            )
            .bind(user_ids)
            .fetch_all(pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, year, section, department)| {
                (
                    id,
                    StudentAttributes {
                        year,
                        section,
                        department,
                    },
                )
            })
            .collect())
    }
}
