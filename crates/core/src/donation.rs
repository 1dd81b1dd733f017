//! Donation status constants, transitions, and validation.

use crate::error::CoreError;
use crate::types::Paise;
use crate::validation::{validate_email, validate_max_length, validate_one_of, validate_required};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_RECEIVED: &str = "received";
pub const STATUS_REJECTED: &str = "rejected";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_APPROVED,
    STATUS_RECEIVED,
    STATUS_REJECTED,
];

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_MESSAGE_LENGTH: usize = 2_000;

/// Smallest accepted monetary pledge (Rs 10).
pub const MIN_AMOUNT_PAISE: Paise = 1_000;

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `pending`  -> `approved`, `rejected`
/// - `approved` -> `received`, `rejected`
/// - `received` and `rejected` are terminal.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_APPROVED, STATUS_REJECTED],
        STATUS_APPROVED => &[STATUS_RECEIVED, STATUS_REJECTED],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("donation status", status, VALID_STATUSES)
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition donation from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate a donation pledge.
pub fn validate_pledge(
    donor_name: &str,
    donor_email: &str,
    amount_paise: Option<Paise>,
    message: Option<&str>,
) -> Result<(), CoreError> {
    validate_required("donor_name", donor_name, MAX_NAME_LENGTH)?;
    validate_email(donor_email)?;
    if let Some(amount) = amount_paise {
        if amount < MIN_AMOUNT_PAISE {
            return Err(CoreError::Validation(format!(
                "amount_paise must be at least {MIN_AMOUNT_PAISE}"
            )));
        }
    }
    if let Some(msg) = message {
        validate_max_length("message", msg, MAX_MESSAGE_LENGTH)?;
    }
    if amount_paise.is_none() && message.is_none_or(|m| m.trim().is_empty()) {
        return Err(CoreError::Validation(
            "a donation needs an amount or a message describing it".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions() {
        assert!(validate_transition(STATUS_PENDING, STATUS_APPROVED).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_REJECTED).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_RECEIVED).is_err());
    }

    #[test]
    fn terminal_statuses_are_final() {
        assert!(valid_transitions(STATUS_RECEIVED).is_empty());
        assert!(valid_transitions(STATUS_REJECTED).is_empty());
        assert!(validate_transition(STATUS_REJECTED, STATUS_PENDING).is_err());
    }

    #[test]
    fn pledge_needs_amount_or_message() {
        assert!(validate_pledge("Ravi", "ravi@example.com", None, None).is_err());
        assert!(validate_pledge("Ravi", "ravi@example.com", None, Some("  ")).is_err());
        assert!(validate_pledge("Ravi", "ravi@example.com", Some(5_000), None).is_ok());
        assert!(validate_pledge("Ravi", "ravi@example.com", None, Some("20 cupcakes")).is_ok());
    }

    #[test]
    fn pledge_minimum_amount() {
        assert!(validate_pledge("Ravi", "ravi@example.com", Some(500), None).is_err());
    }
}
