//! Site-wide notification kinds and validation.

use crate::error::CoreError;
use crate::validation::{validate_one_of, validate_required};

pub const KIND_INFO: &str = "info";
pub const KIND_SUCCESS: &str = "success";
pub const KIND_WARNING: &str = "warning";
pub const KIND_PROMO: &str = "promo";

pub const VALID_KINDS: &[&str] = &[KIND_INFO, KIND_SUCCESS, KIND_WARNING, KIND_PROMO];

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_MESSAGE_LENGTH: usize = 1_000;

pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    validate_one_of("kind", kind, VALID_KINDS)
}

pub fn validate_content(title: &str, message: &str) -> Result<(), CoreError> {
    validate_required("title", title, MAX_TITLE_LENGTH)?;
    validate_required("message", message, MAX_MESSAGE_LENGTH)
}
