//! Product entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweetbox_core::types::{DbId, Paise, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price_paise: Paise,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub is_active: bool,
    /// `is_active` of the owning category, joined in on every read.
    pub category_is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Whether a customer may currently add this product to a cart.
    ///
    /// A product in a hidden category is not purchasable even if the
    /// product itself is active.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.is_available && self.category_is_active
    }
}

/// DTO for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub category_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_paise: Paise,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}

/// DTO for partially updating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub category_id: Option<DbId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_paise: Option<Paise>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
}

/// Query parameters for the public product listing.
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Category slug filter.
    pub category: Option<String>,
    /// Case-insensitive name substring.
    pub search: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
