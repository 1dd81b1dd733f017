//! Typed payloads carried by e-mail-producing events.
//!
//! Publishers serialize these into [`PlatformEvent::payload`](crate::PlatformEvent)
//! and the notifier deserializes them back.

use serde::{Deserialize, Serialize};
use sweetbox_core::types::{DbId, Paise};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmitted {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscribed {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub unsubscribe_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastRecipient {
    pub email: String,
    pub unsubscribe_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterBroadcast {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<BroadcastRecipient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationStatusChanged {
    pub donor_name: String,
    pub donor_email: String,
    pub amount_paise: Option<Paise>,
    pub status: String,
    pub admin_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_name: String,
    pub quantity: i32,
    pub line_total_paise: Paise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub order_id: DbId,
    pub order_number: String,
    pub email: String,
    pub name: String,
    pub hostel: String,
    pub room: String,
    pub items: Vec<OrderLine>,
    pub delivery_fee_paise: Paise,
    pub total_paise: Paise,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: DbId,
    pub order_number: String,
    pub email: String,
    pub name: String,
    pub status: String,
}
