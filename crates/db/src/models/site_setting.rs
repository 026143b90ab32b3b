//! Site-setting entity model.

use serde::Serialize;
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A key/value row from the `site_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteSetting {
    pub id: DbId,
    pub key: String,
    pub value: Option<serde_json::Value>,
    pub updated_at: Timestamp,
}
