//! Banner media types and schedule rules.

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::{validate_max_length, validate_one_of, validate_required, validate_url};

pub const MEDIA_IMAGE: &str = "image";
pub const MEDIA_VIDEO: &str = "video";

/// All accepted banner media types.
pub const VALID_MEDIA_TYPES: &[&str] = &[MEDIA_IMAGE, MEDIA_VIDEO];

pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_SUBTITLE_LENGTH: usize = 240;

/// Validate a banner media type.
pub fn validate_media_type(media_type: &str) -> Result<(), CoreError> {
    validate_one_of("media_type", media_type, VALID_MEDIA_TYPES)
}

/// Validate the text and link fields of a banner.
pub fn validate_content(
    title: &str,
    subtitle: Option<&str>,
    media_url: &str,
    link_url: Option<&str>,
) -> Result<(), CoreError> {
    validate_required("title", title, MAX_TITLE_LENGTH)?;
    if let Some(sub) = subtitle {
        validate_max_length("subtitle", sub, MAX_SUBTITLE_LENGTH)?;
    }
    validate_url("media_url", media_url)?;
    if let Some(link) = link_url {
        validate_url("link_url", link)?;
    }
    Ok(())
}

/// Validate that an optional schedule window is well-ordered.
pub fn validate_window(
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end <= start {
            return Err(CoreError::Validation(
                "ends_at must be later than starts_at".into(),
            ));
        }
    }
    Ok(())
}

/// Whether `now` falls inside the optional `[starts_at, ends_at)` window.
pub fn is_within_window(
    now: Timestamp,
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
) -> bool {
    starts_at.is_none_or(|s| now >= s) && ends_at.is_none_or(|e| now < e)
}
