//! Contact-form status constants and validation.
//!
//! Messages submitted through the public contact form start as `new` and
//! are worked through the admin inbox.

use crate::error::CoreError;
use crate::validation::{
    validate_email, validate_max_length, validate_one_of, validate_phone, validate_required,
};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_NEW: &str = "new";
pub const STATUS_READ: &str = "read";
pub const STATUS_REPLIED: &str = "replied";
pub const STATUS_ARCHIVED: &str = "archived";

pub const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_READ, STATUS_REPLIED, STATUS_ARCHIVED];

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_SUBJECT_LENGTH: usize = 200;
pub const MAX_MESSAGE_LENGTH: usize = 5_000;
pub const MAX_NOTE_LENGTH: usize = 2_000;

/// Returns the set of statuses that `from_status` may transition to.
///
/// - `new`      -> `read`, `replied`, `archived`
/// - `read`     -> `replied`, `archived`
/// - `replied`  -> `archived`
/// - `archived` -> `read` (restore)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_NEW => &[STATUS_READ, STATUS_REPLIED, STATUS_ARCHIVED],
        STATUS_READ => &[STATUS_REPLIED, STATUS_ARCHIVED],
        STATUS_REPLIED => &[STATUS_ARCHIVED],
        STATUS_ARCHIVED => &[STATUS_READ],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("contact status", status, VALID_STATUSES)
}

/// Validate a status change. Setting the current status again is a no-op.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if current == next || valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move contact message from '{current}' to '{next}'. Allowed: {:?}",
            valid_transitions(current)
        )))
    }
}

/// Validate a public contact-form submission.
pub fn validate_submission(
    name: &str,
    email: &str,
    phone: Option<&str>,
    subject: &str,
    message: &str,
) -> Result<(), CoreError> {
    validate_required("name", name, MAX_NAME_LENGTH)?;
    validate_email(email)?;
    if let Some(p) = phone {
        validate_phone(p)?;
    }
    validate_required("subject", subject, MAX_SUBJECT_LENGTH)?;
    validate_required("message", message, MAX_MESSAGE_LENGTH)
}

pub fn validate_note(note: &str) -> Result<(), CoreError> {
    validate_max_length("admin_note", note, MAX_NOTE_LENGTH)
}
