//! Field-level validation helpers shared by every resource.
//!
//! Each helper returns [`CoreError::Validation`] with a message naming the
//! offending field, so handlers can surface it directly as a 400 response.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length accepted for any e-mail address.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Indian mobile numbers, optionally prefixed with `+91` or `0`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+91[\- ]?|0)?[6-9][0-9]{9}$").expect("valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://[^\s]+|/[^\s]*)$").expect("valid regex"));

/// Validate that a text field is non-blank and no longer than `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    validate_max_length(field, trimmed, max)
}

/// Validate that a text field is no longer than `max` characters.
pub fn validate_max_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate an e-mail address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let email = email.trim().to_string();
    if email.len() > MAX_EMAIL_LENGTH || !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Lowercase and trim an e-mail address for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a phone number.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if PHONE_RE.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{phone}' is not a valid phone number"
        )))
    }
}

/// Validate an absolute http(s) URL or a site-relative path.
pub fn validate_url(field: &str, url: &str) -> Result<(), CoreError> {
    if URL_RE.is_match(url.trim()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{field} must be an http(s) URL or a path")))
    }
}

/// Validate that `value` is one of `allowed`.
pub fn validate_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {field} '{value}'. Must be one of: {allowed:?}"
        )))
    }
}

/// Build a URL slug from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of
/// characters into a single `-`.
///
/// ```
/// use sweetbox_core::validation::slugify;
/// assert_eq!(slugify("Choco Lava Cake!"), "choco-lava-cake");
/// assert_eq!(slugify("  Brownies & Bars "), "brownies-bars");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("name", "   ", 10).is_err());
        assert!(validate_required("name", "Cake", 10).is_ok());
    }

    #[test]
    fn required_rejects_too_long() {
        let err = validate_required("name", &"a".repeat(11), 10).unwrap_err();
        assert!(err.to_string().contains("maximum length of 10"));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("baker@example.com").is_ok());
        assert!(validate_email(" baker@example.com ").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Baker@Example.COM "), "baker@example.com");
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("+91 9876543210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("5876543210").is_err());
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("link_url", "https://example.com/offer").is_ok());
        assert!(validate_url("link_url", "/products/brownie").is_ok());
        assert!(validate_url("link_url", "javascript:alert(1)").is_err());
    }

    #[test]
    fn one_of_validation() {
        assert!(validate_one_of("status", "new", &["new", "read"]).is_ok());
        assert!(validate_one_of("status", "gone", &["new", "read"]).is_err());
    }

    #[test]
    fn slugify_handles_edges() {
        assert_eq!(slugify("Red Velvet"), "red-velvet");
        assert_eq!(slugify("--Tiramisu--"), "tiramisu");
        assert_eq!(slugify("!!!"), "");
    }
}
