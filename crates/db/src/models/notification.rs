//! Notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stepwise_core::types::{DbId, Timestamp};

/// A notification row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub kind: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug, Deserialize)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub kind: Option<String>,
}
