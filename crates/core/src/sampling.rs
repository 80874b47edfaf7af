//! QA sampling and KPI acceptance decision.
//!
//! A uniform random sample (without replacement) of validated records is
//! audited, and the sample accuracy maps to one of three contractual
//! outcomes. The random source is injected so tests can seed it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::round2;
use crate::validation::ValidationResult;

// ---------------------------------------------------------------------------
// Contract constants
// ---------------------------------------------------------------------------

/// Share of delivered POIs drawn for the QA audit.
pub const DEFAULT_SAMPLING_RATE: f64 = 0.30;
/// Sample accuracy at or above which the delivery is accepted.
pub const KPI_ACCEPT_THRESHOLD: f64 = 95.0;
/// Sample accuracy at or above which the delivery only needs correction.
pub const KPI_CORRECT_THRESHOLD: f64 = 90.0;

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Contractual acceptance tier for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiDecision {
    Accept,
    RequireCorrection,
    RequireResurvey,
}

impl KpiDecision {
    /// Map a sample accuracy percentage to a decision.
    ///
    /// - `ACCEPT` if `accuracy >= 95.0`
    /// - `REQUIRE_CORRECTION` if `accuracy >= 90.0`
    /// - `REQUIRE_RESURVEY` otherwise
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= KPI_ACCEPT_THRESHOLD {
            Self::Accept
        } else if accuracy >= KPI_CORRECT_THRESHOLD {
            Self::RequireCorrection
        } else {
            Self::RequireResurvey
        }
    }

    /// Wire name, as written to the KPI summary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::RequireCorrection => "REQUIRE_CORRECTION",
            Self::RequireResurvey => "REQUIRE_RESURVEY",
        }
    }

    /// Process exit code for a CLI run ending in this decision.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Accept => 0,
            Self::RequireCorrection => 1,
            Self::RequireResurvey => 2,
        }
    }
}

impl std::fmt::Display for KpiDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable threshold text for each decision, kept in the summary
/// for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRules {
    #[serde(rename = "ACCEPT")]
    pub accept: String,
    #[serde(rename = "REQUIRE_CORRECTION")]
    pub require_correction: String,
    #[serde(rename = "REQUIRE_RESURVEY")]
    pub require_resurvey: String,
}

impl Default for DecisionRules {
    fn default() -> Self {
        Self {
            accept: format!(">= {KPI_ACCEPT_THRESHOLD}%"),
            require_correction: format!(
                "{KPI_CORRECT_THRESHOLD}% - {}%",
                round2(KPI_ACCEPT_THRESHOLD - 0.01)
            ),
            require_resurvey: format!("< {KPI_CORRECT_THRESHOLD}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of the QA sampling audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiResult {
    pub total_pois: usize,
    pub sample_size: usize,
    pub sampling_rate_pct: f64,
    pub valid_in_sample: usize,
    pub invalid_in_sample: usize,
    pub accuracy_pct: f64,
    pub kpi_threshold: f64,
    pub decision: KpiDecision,
    pub decision_rules: DecisionRules,
    /// Identifiers of the audited records, in draw order.
    pub sampled_poi_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Number of records to audit: `ceil(total * rate)`, at least 1, at most
/// `total`.
pub fn sample_size(total: usize, rate: f64) -> usize {
    let wanted = (total as f64 * rate).ceil() as usize;
    wanted.max(1).min(total)
}

/// Validate a sampling rate: must lie in `(0.0, 1.0]`.
pub fn validate_sampling_rate(rate: f64) -> Result<(), CoreError> {
    if rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "sampling_rate must be in (0.0, 1.0], got {rate}"
        )))
    }
}

/// Draw the QA sample with the given random source and decide the KPI.
///
/// Empty batches are rejected: there is no accuracy to decide on.
pub fn sample_and_decide<R: Rng + ?Sized>(
    results: &[ValidationResult],
    rate: f64,
    rng: &mut R,
) -> Result<KpiResult, CoreError> {
    if results.is_empty() {
        return Err(CoreError::InvalidInput(
            "cannot sample an empty batch; at least one validated record is required".into(),
        ));
    }
    validate_sampling_rate(rate)?;

    let total = results.len();
    let size = sample_size(total, rate);
    let sampled: Vec<&ValidationResult> = rand::seq::index::sample(rng, total, size)
        .into_iter()
        .map(|i| &results[i])
        .collect();

    let valid_in_sample = sampled.iter().filter(|r| r.is_valid).count();
    let accuracy_pct = round2(valid_in_sample as f64 / size as f64 * 100.0);

    Ok(KpiResult {
        total_pois: total,
        sample_size: size,
        sampling_rate_pct: round2(rate * 100.0),
        valid_in_sample,
        invalid_in_sample: size - valid_in_sample,
        accuracy_pct,
        kpi_threshold: KPI_ACCEPT_THRESHOLD,
        decision: KpiDecision::from_accuracy(accuracy_pct),
        decision_rules: DecisionRules::default(),
        sampled_poi_ids: sampled.iter().map(|r| r.poi_id.clone()).collect(),
    })
}

/// [`sample_and_decide`] with a seeded [`StdRng`] for reproducible audits,
/// or the thread-local generator when no seed is given.
pub fn sample_and_decide_seeded(
    results: &[ValidationResult],
    rate: f64,
    seed: Option<u64>,
) -> Result<KpiResult, CoreError> {
    match seed {
        Some(seed) => sample_and_decide(results, rate, &mut StdRng::seed_from_u64(seed)),
        None => sample_and_decide(results, rate, &mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn results(valid: usize, invalid: usize) -> Vec<ValidationResult> {
        (0..valid + invalid)
            .map(|i| {
                let is_valid = i < valid;
                ValidationResult {
                    poi_id: format!("ROW_{i}"),
                    index: i,
                    is_valid,
                    errors: if is_valid {
                        vec![]
                    } else {
                        vec!["invalid_uuid_format".into()]
                    },
                    warnings: vec![],
                    minor_deviations: vec![],
                    completeness_pct: 0.0,
                    filled_fields: 0,
                    total_fields: 60,
                }
            })
            .collect()
    }

    // -- from_accuracy --------------------------------------------------------

    #[test]
    fn decision_boundaries() {
        assert_eq!(KpiDecision::from_accuracy(100.0), KpiDecision::Accept);
        assert_eq!(KpiDecision::from_accuracy(95.0), KpiDecision::Accept);
        assert_eq!(KpiDecision::from_accuracy(94.99), KpiDecision::RequireCorrection);
        assert_eq!(KpiDecision::from_accuracy(90.0), KpiDecision::RequireCorrection);
        assert_eq!(KpiDecision::from_accuracy(89.99), KpiDecision::RequireResurvey);
        assert_eq!(KpiDecision::from_accuracy(0.0), KpiDecision::RequireResurvey);
    }

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(KpiDecision::Accept.exit_code(), 0);
        assert_eq!(KpiDecision::RequireCorrection.exit_code(), 1);
        assert_eq!(KpiDecision::RequireResurvey.exit_code(), 2);
    }

    #[test]
    fn decision_serializes_screaming_snake() {
        let json = serde_json::to_string(&KpiDecision::RequireCorrection).unwrap();
        assert_eq!(json, "\"REQUIRE_CORRECTION\"");
        assert_eq!(KpiDecision::RequireResurvey.to_string(), "REQUIRE_RESURVEY");
    }

    #[test]
    fn decision_rule_text() {
        let rules = DecisionRules::default();
        assert_eq!(rules.accept, ">= 95%");
        assert_eq!(rules.require_correction, "90% - 94.99%");
        assert_eq!(rules.require_resurvey, "< 90%");
    }

    // -- sample_size ----------------------------------------------------------

    #[test]
    fn sample_size_formula() {
        assert_eq!(sample_size(10, 0.30), 3);
        assert_eq!(sample_size(1, 0.30), 1);
        assert_eq!(sample_size(7, 0.30), 3);
        assert_eq!(sample_size(100, 0.30), 30);
        assert_eq!(sample_size(4, 1.0), 4);
    }

    #[test]
    fn sampling_rate_must_be_a_fraction() {
        assert!(validate_sampling_rate(0.3).is_ok());
        assert!(validate_sampling_rate(1.0).is_ok());
        assert_matches!(validate_sampling_rate(0.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_sampling_rate(1.5), Err(CoreError::Validation(_)));
        assert_matches!(validate_sampling_rate(f64::NAN), Err(CoreError::Validation(_)));
    }

    // -- sample_and_decide ----------------------------------------------------

    #[test]
    fn empty_batch_is_rejected() {
        let err = sample_and_decide_seeded(&[], DEFAULT_SAMPLING_RATE, Some(1));
        assert_matches!(err, Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn bad_rate_is_rejected() {
        let err = sample_and_decide_seeded(&results(3, 0), 0.0, Some(1));
        assert_matches!(err, Err(CoreError::Validation(_)));
    }

    #[test]
    fn sample_is_without_replacement() {
        let batch = results(50, 50);
        let kpi = sample_and_decide_seeded(&batch, 0.30, Some(7)).unwrap();
        assert_eq!(kpi.sample_size, 30);
        assert_eq!(kpi.sampled_poi_ids.len(), 30);
        let unique: HashSet<_> = kpi.sampled_poi_ids.iter().collect();
        assert_eq!(unique.len(), 30);
        assert_eq!(kpi.valid_in_sample + kpi.invalid_in_sample, 30);
    }

    #[test]
    fn same_seed_same_sample() {
        let batch = results(20, 20);
        let a = sample_and_decide_seeded(&batch, 0.30, Some(42)).unwrap();
        let b = sample_and_decide_seeded(&batch, 0.30, Some(42)).unwrap();
        assert_eq!(a.sampled_poi_ids, b.sampled_poi_ids);
        assert_eq!(a.decision, b.decision);
    }

    #[test]
    fn injected_rng_is_used() {
        let batch = results(20, 20);
        let mut rng = StdRng::seed_from_u64(9);
        let a = sample_and_decide(&batch, 0.30, &mut rng).unwrap();
        let b = sample_and_decide_seeded(&batch, 0.30, Some(9)).unwrap();
        assert_eq!(a.sampled_poi_ids, b.sampled_poi_ids);
    }

    #[test]
    fn all_valid_batch_is_accepted() {
        let kpi = sample_and_decide_seeded(&results(10, 0), 0.30, Some(3)).unwrap();
        assert_eq!(kpi.sample_size, 3);
        assert_eq!(kpi.accuracy_pct, 100.0);
        assert_eq!(kpi.decision, KpiDecision::Accept);
        assert_eq!(kpi.sampling_rate_pct, 30.0);
        assert_eq!(kpi.kpi_threshold, 95.0);
    }

    #[test]
    fn all_invalid_batch_requires_resurvey() {
        let kpi = sample_and_decide_seeded(&results(0, 10), 0.30, Some(3)).unwrap();
        assert_eq!(kpi.accuracy_pct, 0.0);
        assert_eq!(kpi.invalid_in_sample, 3);
        assert_eq!(kpi.decision, KpiDecision::RequireResurvey);
    }

    #[test]
    fn full_rate_audits_everything() {
        let batch = results(19, 1);
        let kpi = sample_and_decide_seeded(&batch, 1.0, None).unwrap();
        assert_eq!(kpi.sample_size, 20);
        assert_eq!(kpi.accuracy_pct, 95.0);
        assert_eq!(kpi.decision, KpiDecision::Accept);
    }

    #[test]
    fn single_record_batch_samples_one() {
        let kpi = sample_and_decide_seeded(&results(1, 0), 0.30, None).unwrap();
        assert_eq!(kpi.sample_size, 1);
        assert_eq!(kpi.sampled_poi_ids, vec!["ROW_0"]);
    }
}
