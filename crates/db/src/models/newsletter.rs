//! Newsletter subscriber model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Timestamp};

/// A row from the `newsletter_subscribers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscriber {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub status: String,
    #[serde(skip_serializing)]
    pub unsubscribe_token: String,
    pub subscribed_at: Timestamp,
    pub unsubscribed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subscribe {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Unsubscribe {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Broadcast {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriberListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
