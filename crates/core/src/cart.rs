//! Cart quantity rules and price reconciliation.
//!
//! Cart lines snapshot the unit price at the time an item is added.
//! Before the cart is shown or checked out, every line is reconciled
//! against the live catalog: changed prices are refreshed and lines whose
//! product disappeared or became unavailable are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Paise};

/// Maximum quantity of a single product per cart line.
pub const MAX_LINE_QUANTITY: i32 = 20;

/// Maximum number of distinct lines in a cart.
pub const MAX_LINES: usize = 50;

/// Validate a requested line quantity. Zero is allowed and means "remove".
pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if !(0..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(CoreError::Validation(format!(
            "quantity must be between 0 and {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// A cart line as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: DbId,
    pub quantity: i32,
    pub unit_price_paise: Paise,
}

/// The live catalog state of a product referenced by a cart.
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub price_paise: Paise,
    pub purchasable: bool,
}

/// Why a line was dropped during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    ProductMissing,
    Unavailable,
}

/// One change applied to a cart during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    PriceChanged {
        product_id: DbId,
        old_price_paise: Paise,
        new_price_paise: Paise,
    },
    Removed {
        product_id: DbId,
        reason: RemovalReason,
    },
}

impl Adjustment {
    pub fn product_id(&self) -> DbId {
        match self {
            Adjustment::PriceChanged { product_id, .. } | Adjustment::Removed { product_id, .. } => {
                *product_id
            }
        }
    }
}

/// Compare cart lines with the live catalog and list the required changes.
///
/// Lines are examined in order; the returned adjustments follow the same
/// order so callers can apply them deterministically.
pub fn reconcile(lines: &[CartLine], catalog: &HashMap<DbId, ProductSnapshot>) -> Vec<Adjustment> {
    lines
        .iter()
        .filter_map(|line| match catalog.get(&line.product_id) {
            None => Some(Adjustment::Removed {
                product_id: line.product_id,
                reason: RemovalReason::ProductMissing,
            }),
            Some(p) if !p.purchasable => Some(Adjustment::Removed {
                product_id: line.product_id,
                reason: RemovalReason::Unavailable,
            }),
            Some(p) if p.price_paise != line.unit_price_paise => Some(Adjustment::PriceChanged {
                product_id: line.product_id,
                old_price_paise: line.unit_price_paise,
                new_price_paise: p.price_paise,
            }),
            Some(_) => None,
        })
        .collect()
}
