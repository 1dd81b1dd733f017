//! User account model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub external_uid: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub hostel: Option<String>,
    pub room: Option<String>,
    pub role: String,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Identity fields taken from a verified identity-provider token.
#[derive(Debug, Clone)]
pub struct UpsertIdentity {
    pub external_uid: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// DTO for a user editing their own profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub hostel: Option<String>,
    pub room: Option<String>,
}

/// Query parameters for the admin user list.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
