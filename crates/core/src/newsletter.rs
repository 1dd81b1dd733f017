//! Newsletter subscription states and broadcast validation.

use crate::error::CoreError;
use crate::validation::{validate_max_length, validate_one_of, validate_required};

pub const STATUS_SUBSCRIBED: &str = "subscribed";
pub const STATUS_UNSUBSCRIBED: &str = "unsubscribed";

pub const VALID_STATUSES: &[&str] = &[STATUS_SUBSCRIBED, STATUS_UNSUBSCRIBED];

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_SUBJECT_LENGTH: usize = 200;
pub const MAX_BODY_LENGTH: usize = 20_000;

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("subscriber status", status, VALID_STATUSES)
}

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    validate_max_length("name", name, MAX_NAME_LENGTH)
}

/// Validate an admin broadcast before it is fanned out.
pub fn validate_broadcast(subject: &str, body: &str) -> Result<(), CoreError> {
    validate_required("subject", subject, MAX_SUBJECT_LENGTH)?;
    validate_required("body", body, MAX_BODY_LENGTH)
}

/// Generate an opaque token embedded in unsubscribe links.
pub fn generate_unsubscribe_token() -> String {
    use rand::distr::{Alphanumeric, SampleString};
    Alphanumeric.sample_string(&mut rand::rng(), 40)
}
