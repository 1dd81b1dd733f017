//! Cart line models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Paise, Timestamp};

/// A row from the `cart_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: DbId,
    pub user_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub unit_price_paise: Paise,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined with its product for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartLineView {
    pub product_id: DbId,
    pub product_name: String,
    pub product_slug: String,
    pub image_url: Option<String>,
    pub category_id: DbId,
    pub quantity: i32,
    pub unit_price_paise: Paise,
    pub line_total_paise: Paise,
}

/// DTO for setting the quantity of one product in the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCartItem {
    pub product_id: DbId,
    pub quantity: i32,
}
