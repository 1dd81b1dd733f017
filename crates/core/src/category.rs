//! Category validation rules.

use crate::error::CoreError;
use crate::validation::{slugify, validate_max_length, validate_required, validate_url};

/// Maximum length of a category name.
pub const MAX_NAME_LENGTH: usize = 80;

/// Maximum length of a category description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

/// Validate a category name and derive its slug.
///
/// Fails when the name is blank, too long, or contains no characters that
/// survive slugification.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    validate_required("name", name, MAX_NAME_LENGTH)?;
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "name must contain at least one letter or digit".into(),
        ));
    }
    Ok(slug)
}

/// Validate the optional fields shared by create and update.
pub fn validate_details(
    description: Option<&str>,
    image_url: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(desc) = description {
        validate_max_length("description", desc, MAX_DESCRIPTION_LENGTH)?;
    }
    if let Some(url) = image_url {
        validate_url("image_url", url)?;
    }
    Ok(())
}
