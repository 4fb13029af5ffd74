//! Internal helpers for model conversion and input normalization.
//!
//! These utilities are **not** part of the public API.

use uuid::Uuid;

use crate::{LedgerError, ResultLedger};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultLedger<Uuid> {
    Uuid::parse_str(value).map_err(|_| LedgerError::InvalidId(format!("invalid {label} id")))
}

/// Trim a user id, rejecting empty values.
pub(crate) fn normalize_user_id(value: &str) -> ResultLedger<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidId("user id must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Convert a stored month number, rejecting anything outside `1..=12`.
pub(crate) fn model_month(year: i32, month: i32) -> ResultLedger<crate::YearMonth> {
    u32::try_from(month)
        .ok()
        .and_then(|month| crate::YearMonth::new(year, month))
        .ok_or_else(|| LedgerError::InvalidDate(format!("invalid stored month {year}-{month}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_trimmed() {
        assert_eq!(normalize_user_id("  alice ").unwrap(), "alice");
        assert!(normalize_user_id("   ").is_err());
    }

    #[test]
    fn blank_text_is_dropped() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")),
            Some("rent".to_string())
        );
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn stored_month_out_of_range() {
        assert!(model_month(2024, 0).is_err());
        assert!(model_month(2024, 12).is_ok());
    }
}
