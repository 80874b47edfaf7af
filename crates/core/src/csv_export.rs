//! CSV builders for the completeness report and the flat record export.

use serde_json::Value;

use crate::field_catalog::ALL_FIELDS;
use crate::types::Record;
use crate::validation::ValidationResult;

/// Column header of the per-record completeness report.
pub const COMPLETENESS_HEADER: &[&str] = &[
    "poi_id",
    "is_valid",
    "completeness_pct",
    "filled_fields",
    "total_fields",
    "error_count",
    "warning_count",
    "errors",
];

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Flatten a JSON value into a single CSV cell.
///
/// Booleans are lowercase, arrays are comma-joined, objects are embedded as
/// JSON text, and null is empty.
fn json_value_to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn join_row<I: IntoIterator<Item = String>>(cells: I) -> String {
    cells
        .into_iter()
        .map(|c| csv_escape(&c))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the completeness report: one row per validation result, errors
/// joined with `"; "`.
pub fn build_completeness_csv(results: &[ValidationResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(COMPLETENESS_HEADER.join(","));

    for r in results {
        lines.push(join_row([
            r.poi_id.clone(),
            r.is_valid.to_string(),
            r.completeness_pct.to_string(),
            r.filled_fields.to_string(),
            r.total_fields.to_string(),
            r.errors.len().to_string(),
            r.warnings.len().to_string(),
            r.errors.join("; "),
        ]));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Build a flat CSV of records with one column per catalog field, in
/// catalog order. Non-catalog keys are dropped.
pub fn build_records_csv(records: &[Record]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(ALL_FIELDS.join(","));

    for record in records {
        lines.push(join_row(ALL_FIELDS.iter().map(|field| {
            record
                .get(*field)
                .map(json_value_to_csv)
                .unwrap_or_default()
        })));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
