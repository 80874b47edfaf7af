//! One end-to-end validation run: load, validate, sample, bill, write.

use std::fs;
use std::path::Path;

use anyhow::Context;

use poiqa_core::billing::{compute_billing, BillingResult};
use poiqa_core::delivery::ContractParties;
use poiqa_core::loader::{records_from_csv, records_from_json, InputFormat};
use poiqa_core::report::{summarize, ValidationReport};
use poiqa_core::sampling::{sample_and_decide_seeded, KpiDecision, KpiResult};
use poiqa_core::types::Record;
use poiqa_core::validation::validate_poi;

use crate::config::Config;
use crate::output::{
    write_delivery_package, write_reports, DeliveryPaths, ReportPaths, RunOutputs,
};

/// Result of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: ValidationReport,
    pub kpi: KpiResult,
    pub billing: BillingResult,
    pub paths: ReportPaths,
    /// Present when a delivery directory was configured.
    pub delivery: Option<DeliveryPaths>,
}

impl RunOutcome {
    pub fn decision(&self) -> KpiDecision {
        self.kpi.decision
    }
}

/// Read and parse an input file into records.
pub fn load_records(path: &Path, format: InputFormat) -> anyhow::Result<Vec<Record>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records = match format {
        InputFormat::Json => {
            let document = serde_json::from_str(&text)
                .with_context(|| format!("parsing JSON in {}", path.display()))?;
            records_from_json(document)?
        }
        InputFormat::Csv => records_from_csv(&text)?,
    };
    Ok(records)
}

/// Execute a full run for `config`.
///
/// An input without records is an error: the QA audit needs at least one.
pub fn run(config: &Config) -> anyhow::Result<RunOutcome> {
    let format = config.input_format();
    tracing::info!(input = %config.input.display(), ?format, "Loading POI data");

    let records = load_records(&config.input, format)?;
    tracing::info!(count = records.len(), "Loaded POI records");
    if records.is_empty() {
        anyhow::bail!("no POI records found in {}", config.input.display());
    }

    let results: Vec<_> = records
        .iter()
        .enumerate()
        .map(|(index, record)| validate_poi(record, index))
        .collect();

    let report = summarize(&results);
    let kpi = sample_and_decide_seeded(&results, config.sampling_rate, config.seed)?;
    let billing = compute_billing(&records);

    let parties = ContractParties {
        client: config.client.clone(),
        provider: config.provider.clone(),
    };
    let outputs = RunOutputs {
        records: &records,
        results: &results,
        report: &report,
        kpi: &kpi,
        billing: &billing,
    };
    let paths = write_reports(&config.output, &parties, &outputs)?;
    let delivery = config
        .delivery_dir
        .as_deref()
        .map(|dir| write_delivery_package(dir, &parties, &outputs))
        .transpose()?;

    log_summary(&report, &kpi, &billing);

    Ok(RunOutcome {
        report,
        kpi,
        billing,
        paths,
        delivery,
    })
}

fn log_summary(report: &ValidationReport, kpi: &KpiResult, billing: &BillingResult) {
    let s = &report.summary;
    tracing::info!(
        total = s.total_pois,
        valid = s.valid_pois,
        invalid = s.invalid_pois,
        accuracy_pct = s.accuracy_pct,
        avg_completeness_pct = s.avg_completeness_pct,
        "Validation summary",
    );
    tracing::info!(
        sample_size = kpi.sample_size,
        sampling_rate_pct = kpi.sampling_rate_pct,
        accuracy_pct = kpi.accuracy_pct,
        decision = %kpi.decision,
        "QA sampling complete",
    );
    tracing::info!(
        subtotal_sar = billing.subtotal,
        remaining_budget_sar = billing.remaining_budget,
        "Billing computed",
    );
    if billing.over_budget {
        tracing::warn!(
            over_by_sar = billing.remaining_budget.abs(),
            "Delivery exceeds the pilot budget cap",
        );
    }
}
