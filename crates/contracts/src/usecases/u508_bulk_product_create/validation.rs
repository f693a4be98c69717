use thiserror::Error;

use super::catalog::{is_main_category, sub_categories};
use super::fields::ProductFields;

/// Required-attribute violations, checked before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    MissingTitle,

    #[error("Valid price is required.")]
    InvalidPrice,

    #[error("Unknown main category: {0}")]
    UnknownMainCategory(String),

    #[error("Sub category {sub} does not belong to {main}")]
    SubCategoryMismatch { main: String, sub: String },
}

/// Parses a price typed as text. Returns `None` unless it is a positive
/// finite number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let price = raw.trim().parse::<f64>().ok()?;
    (price.is_finite() && price > 0.0).then_some(price)
}

pub fn validate(fields: &ProductFields) -> Result<(), ValidationError> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if parse_price(&fields.price).is_none() {
        return Err(ValidationError::InvalidPrice);
    }

    // Categories are optional; without them the product just gets no tags.
    let main = fields.main_category.trim();
    if main.is_empty() {
        return Ok(());
    }
    if !is_main_category(main) {
        return Err(ValidationError::UnknownMainCategory(main.to_string()));
    }

    let sub = fields.sub_category.trim();
    if !sub.is_empty() && !sub_categories(main).contains(&sub) {
        return Err(ValidationError::SubCategoryMismatch {
            main: main.to_string(),
            sub: sub.to_string(),
        });
    }

    Ok(())
}
