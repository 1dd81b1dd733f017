//! Product validation rules.

use crate::error::CoreError;
use crate::types::Paise;
use crate::validation::{slugify, validate_max_length, validate_required, validate_url};

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Upper bound for a single product price (Rs 1,00,000).
pub const MAX_PRICE_PAISE: Paise = 10_000_000;

/// Validate a product name and derive its slug.
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

/// Validate a product price in paise.
pub fn validate_price(price_paise: Paise) -> Result<(), CoreError> {
    if price_paise <= 0 {
        return Err(CoreError::Validation("price_paise must be positive".into()));
    }
    if price_paise > MAX_PRICE_PAISE {
        return Err(CoreError::Validation(format!(
            "price_paise exceeds maximum of {MAX_PRICE_PAISE}"
        )));
    }
    Ok(())
}

/// Validate the optional descriptive fields.
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
