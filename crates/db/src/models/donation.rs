//! Donation pledge model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Paise, Timestamp};

/// A row from the `donations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub user_id: DbId,
    pub donor_name: String,
    pub donor_email: String,
    pub amount_paise: Option<Paise>,
    pub message: Option<String>,
    pub status: String,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDonation {
    pub donor_name: String,
    pub donor_email: String,
    pub amount_paise: Option<Paise>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDonationStatus {
    pub status: String,
    pub admin_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DonationListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
