//! Internal helpers for input validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation rejects bad input the same way.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and NFC-normalize a required text field.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(normalized)
}

/// Trim and NFC-normalize an optional text field; blank becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

pub(crate) fn ensure_non_negative(value: i32, label: &str) -> ResultEngine<()> {
    if value < 0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be negative"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive_quantity(quantity: i32) -> ResultEngine<()> {
    if quantity < 1 {
        return Err(EngineError::InvalidInput(
            "quantity must be at least 1".to_string(),
        ));
    }
    Ok(())
}
