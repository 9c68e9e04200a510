//! Field validation and defaults shared by shopping items and catalog items.

use crate::Error;

/// The quantity used when an item is created without one.
pub const DEFAULT_QUANTITY: i64 = 1;
/// The unit used when an item is created without one.
pub const DEFAULT_UNIT: &str = "pcs";
/// The category used when an item is created without one.
pub const DEFAULT_CATEGORY: &str = "General";
/// The price used when an item is created without one.
pub const DEFAULT_PRICE: f64 = 0.0;

/// Trim `name` and check that something is left.
///
/// `field` names the field in the error message, e.g. "list name".
///
/// # Errors
///
/// Returns [Error::EmptyName] if `name` is empty or only whitespace.
pub fn validate_name(name: &str, field: &'static str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        Err(Error::EmptyName(field))
    } else {
        Ok(name.to_owned())
    }
}

/// Check that `quantity` is at least one.
pub fn validate_quantity(quantity: i64) -> Result<i64, Error> {
    if quantity < 1 {
        Err(Error::InvalidQuantity(quantity))
    } else {
        Ok(quantity)
    }
}

/// Check that `price` is a finite, non-negative number.
pub fn validate_price(price: f64) -> Result<f64, Error> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(Error::InvalidPrice(price))
    }
}

/// Use the trimmed `value`, or `default` if it is missing or blank.
pub fn text_or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => default.to_owned(),
    }
}

/// Trim an optional text field for a partial update.
///
/// A blank value counts as not provided.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
