//! Validation finding codes and the per-record result type.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error codes (invalidate the record)
// ---------------------------------------------------------------------------

pub const CODE_REQUIRED_FIELD_MISSING: &str = "required_field_missing";
pub const CODE_INVALID_UUID_FORMAT: &str = "invalid_uuid_format";
pub const CODE_CATEGORY_NOT_LOWERCASE: &str = "category_not_lowercase";
pub const CODE_BOOLEAN_NOT_STRICT: &str = "boolean_not_strict";
pub const CODE_WORKING_HOURS_INVALID: &str = "working_hours_invalid_or_empty";

// ---------------------------------------------------------------------------
// Warning codes (advisory)
// ---------------------------------------------------------------------------

pub const CODE_UNKNOWN_COMPANY_STATUS: &str = "unknown_company_status";
pub const CODE_PHONE_NOT_KSA_FORMAT: &str = "phone_not_ksa_format";
pub const CODE_UNKNOWN_PAYMENT_METHOD: &str = "unknown_payment_method";
pub const CODE_UNKNOWN_LANGUAGE: &str = "unknown_language";

/// Suffix of the minor-deviation note raised for one-character names.
pub const SUFFIX_POSSIBLY_TOO_SHORT: &str = "_possibly_too_short";

/// Outcome of validating a single POI record.
///
/// `errors` invalidate the record; `warnings` and `minor_deviations` are
/// advisory and never affect `is_valid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The record's `global_id`, or `ROW_<index>` when it has none.
    pub poi_id: String,
    /// Position of the record in the input batch.
    pub index: usize,
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub minor_deviations: Vec<String>,
    /// Filled catalog fields as a percentage of all catalog fields.
    pub completeness_pct: f64,
    pub filled_fields: usize,
    pub total_fields: usize,
}

/// Frequency-table key of a finding: the text before the first colon.
pub fn finding_key(finding: &str) -> &str {
    finding.split_once(':').map_or(finding, |(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_key_strips_detail() {
        assert_eq!(finding_key("required_field_missing: name_en"), "required_field_missing");
        assert_eq!(finding_key("boolean_not_strict: wifi=maybe"), "boolean_not_strict");
    }

    #[test]
    fn finding_key_without_colon_is_whole_string() {
        assert_eq!(finding_key("zero_coordinates"), "zero_coordinates");
        assert_eq!(
            finding_key("latitude_out_of_ksa_bounds (40.5)"),
            "latitude_out_of_ksa_bounds (40.5)"
        );
    }
}
