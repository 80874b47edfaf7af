//! Rule evaluator: pure logic, no I/O.
//!
//! Every rule runs against every record. Each rule is an independent
//! function that appends to a shared [`Findings`] accumulator, so one
//! violation never hides another.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::rules::{
    ValidationResult, CODE_BOOLEAN_NOT_STRICT, CODE_CATEGORY_NOT_LOWERCASE,
    CODE_INVALID_UUID_FORMAT, CODE_PHONE_NOT_KSA_FORMAT, CODE_REQUIRED_FIELD_MISSING,
    CODE_UNKNOWN_COMPANY_STATUS, CODE_UNKNOWN_LANGUAGE, CODE_UNKNOWN_PAYMENT_METHOD,
    CODE_WORKING_HOURS_INVALID, SUFFIX_POSSIBLY_TOO_SHORT,
};
use crate::field_catalog::{
    in_vocabulary, is_filled, ALL_FIELDS, BOOLEAN_FIELDS, BOOLEAN_SPELLINGS, FIELD_CATEGORY,
    FIELD_COMPANY_STATUS, FIELD_GLOBAL_ID, FIELD_LANGUAGES, FIELD_LATITUDE, FIELD_LONGITUDE,
    FIELD_NAME_AR, FIELD_NAME_EN, FIELD_PAYMENT_METHODS, FIELD_PHONE_NUMBER, FIELD_WORKING_HOURS,
    REQUIRED_FIELDS, VALID_LANGUAGES, VALID_PAYMENTS, VALID_STATUSES,
};
use crate::geo::validate_coordinates;
use crate::types::{round2, Record};

/// KSA mobile/landline after separators are stripped: `+966`, `05` or `5`
/// followed by 8 or 9 digits.
const KSA_PHONE_PATTERN: &str = r"^(\+966|05|5)\d{8,9}$";

static KSA_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(KSA_PHONE_PATTERN).expect("valid regex"));

/// Accumulated output of the rule pass for one record.
#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
    minor_deviations: Vec<String>,
}

type Rule = fn(&Record, &mut Findings);

/// Rules in evaluation order. Completeness is scored separately.
const RULES: &[Rule] = &[
    check_required_fields,
    check_global_id,
    check_category_case,
    check_coordinates,
    check_strict_booleans,
    check_company_status,
    check_phone_format,
    check_working_hours,
    check_payment_methods,
    check_languages,
    check_short_names,
];

/// Validate one record against the full contractual rule set.
///
/// Total: malformed input produces findings, never a panic or an error.
pub fn validate_poi(record: &Record, index: usize) -> ValidationResult {
    let mut findings = Findings::default();
    for rule in RULES {
        rule(record, &mut findings);
    }

    let filled_fields = ALL_FIELDS
        .iter()
        .filter(|f| is_filled(record.get(**f)))
        .count();
    let total_fields = ALL_FIELDS.len();
    let completeness_pct = round2(filled_fields as f64 / total_fields as f64 * 100.0);

    ValidationResult {
        poi_id: poi_id(record, index),
        index,
        is_valid: findings.errors.is_empty(),
        errors: findings.errors,
        warnings: findings.warnings,
        minor_deviations: findings.minor_deviations,
        completeness_pct,
        filled_fields,
        total_fields,
    }
}

fn poi_id(record: &Record, index: usize) -> String {
    match record.get(FIELD_GLOBAL_ID) {
        None | Some(Value::Null) => format!("ROW_{index}"),
        Some(value) => display_value(value),
    }
}

/// Render a raw value for inclusion in a finding message.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn check_required_fields(record: &Record, out: &mut Findings) {
    for field in REQUIRED_FIELDS {
        if !is_filled(record.get(*field)) {
            out.errors
                .push(format!("{CODE_REQUIRED_FIELD_MISSING}: {field}"));
        }
    }
}

fn check_global_id(record: &Record, out: &mut Findings) {
    let value = record.get(FIELD_GLOBAL_ID);
    if !is_filled(value) {
        return;
    }
    let parsed = value
        .and_then(Value::as_str)
        .map(|s| uuid::Uuid::parse_str(s.trim()).is_ok())
        .unwrap_or(false);
    if !parsed {
        out.errors.push(CODE_INVALID_UUID_FORMAT.to_string());
    }
}

fn check_category_case(record: &Record, out: &mut Findings) {
    let Some(value) = record.get(FIELD_CATEGORY).filter(|v| is_filled(Some(*v))) else {
        return;
    };
    let lowercase = value.as_str().is_some_and(|s| s == s.to_lowercase());
    if !lowercase {
        out.errors.push(format!(
            "{CODE_CATEGORY_NOT_LOWERCASE}: \"{}\"",
            display_value(value)
        ));
    }
}

fn check_coordinates(record: &Record, out: &mut Findings) {
    out.errors.extend(validate_coordinates(
        record.get(FIELD_LATITUDE),
        record.get(FIELD_LONGITUDE),
    ));
}

fn check_strict_booleans(record: &Record, out: &mut Findings) {
    for field in BOOLEAN_FIELDS {
        let strict = match record.get(*field) {
            None | Some(Value::Null) | Some(Value::Bool(_)) => true,
            Some(Value::String(s)) => BOOLEAN_SPELLINGS.contains(&s.trim().to_lowercase().as_str()),
            Some(_) => false,
        };
        if !strict {
            let raw = record.get(*field).map(display_value).unwrap_or_default();
            out.errors
                .push(format!("{CODE_BOOLEAN_NOT_STRICT}: {field}={raw}"));
        }
    }
}

fn check_working_hours(record: &Record, out: &mut Findings) {
    if !is_filled(record.get(FIELD_WORKING_HOURS)) {
        out.errors.push(CODE_WORKING_HOURS_INVALID.to_string());
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Filled string value of `field`, if any.
fn filled_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    let value = record.get(field);
    if is_filled(value) {
        value.and_then(Value::as_str)
    } else {
        None
    }
}

fn check_company_status(record: &Record, out: &mut Findings) {
    if let Some(status) = filled_str(record, FIELD_COMPANY_STATUS) {
        if !in_vocabulary(status.trim(), VALID_STATUSES) {
            out.warnings
                .push(format!("{CODE_UNKNOWN_COMPANY_STATUS}: \"{status}\""));
        }
    }
}

/// Whether `phone` matches the KSA format once spaces, dashes and
/// parentheses are removed.
pub fn is_ksa_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|&c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    KSA_PHONE_RE.is_match(&cleaned)
}

fn check_phone_format(record: &Record, out: &mut Findings) {
    if let Some(phone) = filled_str(record, FIELD_PHONE_NUMBER) {
        if !is_ksa_phone(phone) {
            out.warnings
                .push(format!("{CODE_PHONE_NOT_KSA_FORMAT}: \"{phone}\""));
        }
    }
}

/// Warn once per string element of a list field that falls outside its
/// vocabulary. Non-list values and non-string elements are ignored.
fn check_vocabulary_list(
    record: &Record,
    field: &str,
    vocabulary: &[&str],
    code: &str,
    out: &mut Findings,
) {
    let Some(items) = record.get(field).and_then(Value::as_array) else {
        return;
    };
    for item in items.iter().filter_map(Value::as_str) {
        if !in_vocabulary(item, vocabulary) {
            out.warnings.push(format!("{code}: \"{item}\""));
        }
    }
}

fn check_payment_methods(record: &Record, out: &mut Findings) {
    check_vocabulary_list(
        record,
        FIELD_PAYMENT_METHODS,
        VALID_PAYMENTS,
        CODE_UNKNOWN_PAYMENT_METHOD,
        out,
    );
}

fn check_languages(record: &Record, out: &mut Findings) {
    check_vocabulary_list(
        record,
        FIELD_LANGUAGES,
        VALID_LANGUAGES,
        CODE_UNKNOWN_LANGUAGE,
        out,
    );
}

// ---------------------------------------------------------------------------
// Minor deviations
// ---------------------------------------------------------------------------

fn check_short_names(record: &Record, out: &mut Findings) {
    for field in [FIELD_NAME_AR, FIELD_NAME_EN] {
        let Some(name) = record.get(field).and_then(Value::as_str) else {
            continue;
        };
        if name.trim().chars().count() == 1 {
            out.minor_deviations
                .push(format!("{field}{SUFFIX_POSSIBLY_TOO_SHORT}"));
        }
    }
}
