//! Order, order item, and dispatch models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Paise, Timestamp};

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    pub user_id: DbId,
    pub status: String,
    pub payment_status: String,
    pub hostel: String,
    pub room: String,
    pub phone: String,
    pub notes: Option<String>,
    pub subtotal_paise: Paise,
    pub delivery_fee_paise: Paise,
    pub total_paise: Paise,
    pub gateway_order_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub category_id: Option<DbId>,
    pub product_name: String,
    pub unit_price_paise: Paise,
    pub quantity: i32,
    pub dispatched_quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order together with its items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Item snapshot written when an order is placed.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: DbId,
    pub category_id: Option<DbId>,
    pub product_name: String,
    pub unit_price_paise: Paise,
    pub quantity: i32,
}

/// Everything needed to insert an order and its items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: DbId,
    pub hostel: String,
    pub room: String,
    pub phone: String,
    pub notes: Option<String>,
    pub subtotal_paise: Paise,
    pub delivery_fee_paise: Paise,
    pub total_paise: Paise,
    pub items: Vec<NewOrderItem>,
}

/// DTO for checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub hostel: String,
    pub room: String,
    pub phone: String,
    pub notes: Option<String>,
}

/// DTO posted by the browser after the gateway checkout completes.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPayment {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// DTO for an admin status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}

/// Query parameters for the admin order list.
#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub hostel: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregated outstanding quantity per hostel and product.
#[derive(Debug, Clone, FromRow)]
pub struct DispatchRow {
    pub hostel: String,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub product_id: DbId,
    pub product_name: String,
    pub pending_quantity: i64,
    pub order_count: i64,
}

/// An order item with undispatched units, as seen by the dispatch allocator.
#[derive(Debug, Clone, FromRow)]
pub struct OutstandingItemRow {
    pub order_item_id: DbId,
    pub order_id: DbId,
    pub remaining: i32,
}

/// DTO for recording a dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub hostel: String,
    pub product_id: DbId,
    pub quantity: i32,
}

/// Result of recording a dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub dispatched_quantity: i32,
    pub orders_touched: Vec<DbId>,
    pub orders_out_for_delivery: Vec<DbId>,
}
