//! Contact-form message model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Timestamp};

/// A row from the `contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a public contact-form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

/// DTO for admin triage of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContact {
    pub status: Option<String>,
    pub admin_note: Option<String>,
}

/// Query parameters for the admin inbox.
#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
