//! Batch-level aggregation of per-record validation results.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::round2;
use crate::validation::rules::{finding_key, ValidationResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Headline numbers for a validated batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_pois: usize,
    pub valid_pois: usize,
    pub invalid_pois: usize,
    pub accuracy_pct: f64,
    pub avg_completeness_pct: f64,
}

/// Finding counts keyed by finding code, most frequent first.
///
/// Ties keep the order in which the code was first seen. Serializes as a
/// JSON object whose key order is the table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable(Vec<(String, usize)>);

impl FrequencyTable {
    /// Count findings by [`finding_key`] and sort descending by count.
    pub fn tally<'a, I>(findings: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut entries: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for finding in findings {
            let key = finding_key(finding);
            match positions.get(key) {
                Some(&pos) => entries[pos].1 += 1,
                None => {
                    positions.insert(key.to_string(), entries.len());
                    entries.push((key.to_string(), 1));
                }
            }
        }

        // Stable: equal counts stay in first-seen order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self(entries)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, n)| *n)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Aggregate report over every validated record in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub error_frequency: FrequencyTable,
    pub warning_frequency: FrequencyTable,
    /// Results of every invalid record, in input order.
    pub invalid_records: Vec<ValidationResult>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Reduce per-record results into a batch report.
///
/// An empty batch yields zero accuracy and zero average completeness.
pub fn summarize(results: &[ValidationResult]) -> ValidationReport {
    let total = results.len();
    let valid = results.iter().filter(|r| r.is_valid).count();

    let (accuracy_pct, avg_completeness_pct) = if total == 0 {
        (0.0, 0.0)
    } else {
        let completeness_sum: f64 = results.iter().map(|r| r.completeness_pct).sum();
        (
            round2(valid as f64 / total as f64 * 100.0),
            round2(completeness_sum / total as f64),
        )
    };

    ValidationReport {
        summary: ReportSummary {
            total_pois: total,
            valid_pois: valid,
            invalid_pois: total - valid,
            accuracy_pct,
            avg_completeness_pct,
        },
        error_frequency: FrequencyTable::tally(results.iter().flat_map(|r| &r.errors)),
        warning_frequency: FrequencyTable::tally(results.iter().flat_map(|r| &r.warnings)),
        invalid_records: results.iter().filter(|r| !r.is_valid).cloned().collect(),
    }
}
