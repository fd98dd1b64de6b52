// Validation utilities module
// Custom validator functions for domain-specific rules

use regex::Regex;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Chilean style tax id: body digits (dots allowed) + check digit
static TAX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}(\.?\d{3}){2}-?[\dkK]$").expect("valid regex"));

/// Upper bound for a single line quantity, also enforced by request DTOs
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Validates that a field is not blank after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a tax id (RUT) format such as `12.345.678-5` or `12345678K`
pub fn validate_tax_id(value: &str) -> Result<(), ValidationError> {
    if TAX_ID.is_match(value.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_tax_id");
        err.message = Some("Tax id must look like 12.345.678-9".into());
        Err(err)
    }
}

/// Runs each nested item's own validation and reports the first failing index
pub fn validate_items<T: Validate>(items: &[T]) -> Result<(), ValidationError> {
    for (index, item) in items.iter().enumerate() {
        if let Err(errors) = item.validate() {
            let mut err = ValidationError::new("invalid_item");
            err.message = Some(format!("Item {} is invalid: {}", index, errors).into());
            return Err(err);
        }
    }
    Ok(())
}
