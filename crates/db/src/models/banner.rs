//! Banner entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Timestamp};

/// A row from the `banners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Banner {
    pub id: DbId,
    pub title: String,
    pub subtitle: Option<String>,
    pub media_url: String,
    pub media_type: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBanner {
    pub title: String,
    pub subtitle: Option<String>,
    pub media_url: String,
    pub media_type: Option<String>,
    pub link_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBanner {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub link_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}
