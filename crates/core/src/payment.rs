//! Payment constants and gateway signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

pub const PROVIDER_RAZORPAY: &str = "razorpay";
pub const CURRENCY_INR: &str = "INR";

pub const STATUS_CAPTURED: &str = "captured";
pub const STATUS_FAILED: &str = "failed";

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex HMAC-SHA256 of `payload` under `secret`.
pub fn sign(payload: &str, secret: &str) -> Result<String, CoreError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| CoreError::Internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a checkout signature returned by the gateway to the browser.
///
/// The signed payload is `"{gateway_order_id}|{gateway_payment_id}"`.
/// The comparison runs in constant time.
pub fn verify_checkout_signature(
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
    secret: &str,
) -> Result<bool, CoreError> {
    verify_payload(&format!("{gateway_order_id}|{gateway_payment_id}"), signature, secret)
}

/// Verify the signature header of a gateway webhook body.
pub fn verify_webhook_signature(body: &str, signature: &str, secret: &str) -> Result<bool, CoreError> {
    verify_payload(body, signature, secret)
}

fn verify_payload(payload: &str, signature: &str, secret: &str) -> Result<bool, CoreError> {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return Ok(false);
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| CoreError::Internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(payload.as_bytes());
    Ok(mac.verify_slice(&expected).is_ok())
}
