//! Payment record model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Paise, Timestamp};

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub order_id: DbId,
    pub user_id: DbId,
    pub provider: String,
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub amount_paise: Paise,
    pub currency: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values recorded for a gateway payment attempt.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub order_id: DbId,
    pub user_id: DbId,
    pub provider: String,
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub amount_paise: Paise,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
