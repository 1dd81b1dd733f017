//! Order lifecycle, pricing, and delivery-detail validation.

use chrono::Utc;

use crate::error::CoreError;
use crate::types::Paise;
use crate::validation::{validate_max_length, validate_phone, validate_required};

// ---------------------------------------------------------------------------
// Order status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_PREPARING: &str = "preparing";
pub const STATUS_OUT_FOR_DELIVERY: &str = "out_for_delivery";
pub const STATUS_DELIVERED: &str = "delivered";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_CONFIRMED,
    STATUS_PREPARING,
    STATUS_OUT_FOR_DELIVERY,
    STATUS_DELIVERED,
    STATUS_CANCELLED,
];

/// Statuses whose items still count towards the dispatch board.
pub const DISPATCHABLE_STATUSES: &[&str] = &[STATUS_CONFIRMED, STATUS_PREPARING];

// ---------------------------------------------------------------------------
// Payment status
// ---------------------------------------------------------------------------

pub const PAYMENT_UNPAID: &str = "unpaid";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_FAILED: &str = "failed";
pub const PAYMENT_REFUNDED: &str = "refunded";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_HOSTEL_LENGTH: usize = 80;
pub const MAX_ROOM_LENGTH: usize = 20;
pub const MAX_NOTES_LENGTH: usize = 500;

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `pending`          -> `confirmed`, `cancelled`
/// - `confirmed`        -> `preparing`, `out_for_delivery`, `cancelled`
/// - `preparing`        -> `out_for_delivery`, `cancelled`
/// - `out_for_delivery` -> `delivered`
/// - `delivered` and `cancelled` are terminal.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_CONFIRMED, STATUS_CANCELLED],
        STATUS_CONFIRMED => &[STATUS_PREPARING, STATUS_OUT_FOR_DELIVERY, STATUS_CANCELLED],
        STATUS_PREPARING => &[STATUS_OUT_FOR_DELIVERY, STATUS_CANCELLED],
        STATUS_OUT_FOR_DELIVERY => &[STATUS_DELIVERED],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    crate::validation::validate_one_of("order status", status, VALID_STATUSES)
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition order from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate the delivery details captured at checkout.
pub fn validate_delivery(
    hostel: &str,
    room: &str,
    phone: &str,
    notes: Option<&str>,
) -> Result<(), CoreError> {
    validate_required("hostel", hostel, MAX_HOSTEL_LENGTH)?;
    validate_required("room", room, MAX_ROOM_LENGTH)?;
    validate_phone(phone)?;
    if let Some(n) = notes {
        validate_max_length("notes", n, MAX_NOTES_LENGTH)?;
    }
    Ok(())
}

/// Order totals in paise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal_paise: Paise,
    pub delivery_fee_paise: Paise,
    pub total_paise: Paise,
}

/// Compute order totals from `(unit_price, quantity)` lines.
///
/// The delivery fee is waived once the subtotal reaches
/// `free_delivery_threshold` (when one is configured).
pub fn compute_totals(
    lines: &[(Paise, i32)],
    delivery_fee: Paise,
    free_delivery_threshold: Option<Paise>,
) -> OrderTotals {
    let subtotal_paise: Paise = lines
        .iter()
        .map(|(price, qty)| price * Paise::from(*qty))
        .sum();
    let delivery_fee_paise = match free_delivery_threshold {
        Some(threshold) if subtotal_paise >= threshold => 0,
        _ if subtotal_paise == 0 => 0,
        _ => delivery_fee,
    };
    OrderTotals {
        subtotal_paise,
        delivery_fee_paise,
        total_paise: subtotal_paise + delivery_fee_paise,
    }
}

/// Generate a human-friendly order number such as `SB-20261018-4F7K2Q`.
pub fn generate_order_number() -> String {
    use rand::distr::{Alphanumeric, SampleString};
    let suffix = Alphanumeric
        .sample_string(&mut rand::rng(), 6)
        .to_uppercase();
    format!("SB-{}-{suffix}", Utc::now().format("%Y%m%d"))
}
