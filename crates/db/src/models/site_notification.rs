//! Site notification entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Timestamp};

/// A row from the `site_notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteNotification {
    pub id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_active: bool,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSiteNotification {
    pub title: String,
    pub message: String,
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSiteNotification {
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}
