//! Repository for the `site_settings` table.

use sqlx::PgPool;

use crate::models::site_setting::SiteSetting;

/// Column list for `site_settings` queries.
const COLUMNS: &str = "id, key, value, updated_at";

/// Provides key/value reads and the bulk upsert used by the settings page.
pub struct SiteSettingRepo;

impl SiteSettingRepo {
    /// Load every settings row.
    pub async fn list(pool: &PgPool) -> Result<Vec<SiteSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_settings ORDER BY key");
        sqlx::query_as::<_, SiteSetting>(&query).fetch_all(pool).await
    }

    /// Upsert a batch of `(key, value)` pairs in one transaction.
    ///
    /// Keys not in the batch are left untouched.
    pub async fn upsert_many(
        pool: &PgPool,
        rows: &[(&str, serde_json::Value)],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (key, value) in rows {
            sqlx::query(
                "INSERT INTO site_settings (key, value) VALUES ($1, $2)
                 ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
