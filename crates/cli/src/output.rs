//! Report documents and the files they are written to.
//!
//! Engine values are wrapped in small envelopes that add a title, the
//! contract parties, and a generation timestamp before serialization. A
//! delivery package adds the record exports, the data dictionary, and the
//! compliance statement next to a copy of the reports.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;

use poiqa_core::billing::BillingResult;
use poiqa_core::csv_export::{build_completeness_csv, build_records_csv};
use poiqa_core::delivery::{compliance_statement, json_export, ComplianceFacts, ContractParties};
use poiqa_core::dictionary::data_dictionary;
use poiqa_core::report::ValidationReport;
use poiqa_core::sampling::KpiResult;
use poiqa_core::types::Record;
use poiqa_core::validation::ValidationResult;

pub const VALIDATION_REPORT_FILE: &str = "validation_report.json";
pub const KPI_SUMMARY_FILE: &str = "kpi_summary.json";
pub const COMPLETENESS_REPORT_FILE: &str = "completeness_report.csv";
pub const BILLING_SUMMARY_FILE: &str = "billing_summary.json";

pub const VALIDATION_REPORT_TITLE: &str = "POI Validation Report";

pub const DELIVERY_CSV_DIR: &str = "csv";
pub const DELIVERY_JSON_DIR: &str = "json";
pub const DELIVERY_MEDIA_DIR: &str = "media";
pub const DELIVERY_CSV_FILE: &str = "poi_delivery.csv";
pub const DELIVERY_JSON_FILE: &str = "poi_delivery.json";
pub const DATA_DICTIONARY_FILE: &str = "data_dictionary.json";
pub const COMPLIANCE_STATEMENT_FILE: &str = "compliance_statement.txt";

#[derive(Debug, Serialize)]
pub struct ValidationReportDocument<'a> {
    pub report_title: &'static str,
    pub contract: &'a ContractParties,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: &'a ValidationReport,
}

#[derive(Debug, Serialize)]
pub struct KpiSummaryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kpi: &'a KpiResult,
}

#[derive(Debug, Serialize)]
pub struct BillingSummaryDocument<'a> {
    pub contract: &'a ContractParties,
    pub generated_at: DateTime<Utc>,
    pub billing: &'a BillingResult,
}

/// Everything a run produces, ready to be written.
#[derive(Debug)]
pub struct RunOutputs<'a> {
    pub records: &'a [Record],
    pub results: &'a [ValidationResult],
    pub report: &'a ValidationReport,
    pub kpi: &'a KpiResult,
    pub billing: &'a BillingResult,
}

/// Paths of the files written by [`write_reports`].
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub validation_report: PathBuf,
    pub kpi_summary: PathBuf,
    pub completeness_report: PathBuf,
    pub billing_summary: PathBuf,
}

/// Paths of the files written by [`write_delivery_package`].
#[derive(Debug, Clone)]
pub struct DeliveryPaths {
    pub reports: ReportPaths,
    pub records_csv: PathBuf,
    pub records_json: PathBuf,
    pub media_dir: PathBuf,
    pub data_dictionary: PathBuf,
    pub compliance_statement: PathBuf,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

/// Write the four report files into `dir`, creating it if needed.
pub fn write_reports(
    dir: &Path,
    parties: &ContractParties,
    outputs: &RunOutputs<'_>,
) -> anyhow::Result<ReportPaths> {
    create_dir(dir)?;
    let generated_at = Utc::now();

    let paths = ReportPaths {
        validation_report: dir.join(VALIDATION_REPORT_FILE),
        kpi_summary: dir.join(KPI_SUMMARY_FILE),
        completeness_report: dir.join(COMPLETENESS_REPORT_FILE),
        billing_summary: dir.join(BILLING_SUMMARY_FILE),
    };

    write_json(
        &paths.validation_report,
        &ValidationReportDocument {
            report_title: VALIDATION_REPORT_TITLE,
            contract: parties,
            generated_at,
            report: outputs.report,
        },
    )?;
    tracing::info!(path = %paths.validation_report.display(), "Validation report written");

    write_json(
        &paths.kpi_summary,
        &KpiSummaryDocument {
            generated_at,
            kpi: outputs.kpi,
        },
    )?;
    tracing::info!(path = %paths.kpi_summary.display(), "KPI summary written");

    fs::write(
        &paths.completeness_report,
        build_completeness_csv(outputs.results),
    )
    .with_context(|| format!("writing {}", paths.completeness_report.display()))?;
    tracing::info!(path = %paths.completeness_report.display(), "Completeness report written");

    write_json(
        &paths.billing_summary,
        &BillingSummaryDocument {
            contract: parties,
            generated_at,
            billing: outputs.billing,
        },
    )?;
    tracing::info!(path = %paths.billing_summary.display(), "Billing summary written");

    Ok(paths)
}

fn create_dir(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))
}

/// Assemble a delivery package in `dir`:
///
/// ```text
/// dir/
///   csv/poi_delivery.csv
///   json/poi_delivery.json
///   media/
///   data_dictionary.json
///   compliance_statement.txt
///   + the four report files
/// ```
///
/// `media/` is created empty; media assets are copied in by whoever ships
/// the package.
pub fn write_delivery_package(
    dir: &Path,
    parties: &ContractParties,
    outputs: &RunOutputs<'_>,
) -> anyhow::Result<DeliveryPaths> {
    let reports = write_reports(dir, parties, outputs)?;
    let generated_at = Utc::now();

    let paths = DeliveryPaths {
        reports,
        records_csv: dir.join(DELIVERY_CSV_DIR).join(DELIVERY_CSV_FILE),
        records_json: dir.join(DELIVERY_JSON_DIR).join(DELIVERY_JSON_FILE),
        media_dir: dir.join(DELIVERY_MEDIA_DIR),
        data_dictionary: dir.join(DATA_DICTIONARY_FILE),
        compliance_statement: dir.join(COMPLIANCE_STATEMENT_FILE),
    };
    for sub in [DELIVERY_CSV_DIR, DELIVERY_JSON_DIR, DELIVERY_MEDIA_DIR] {
        create_dir(&dir.join(sub))?;
    }

    fs::write(&paths.records_csv, build_records_csv(outputs.records))
        .with_context(|| format!("writing {}", paths.records_csv.display()))?;
    tracing::info!(path = %paths.records_csv.display(), "CSV export written");

    write_json(
        &paths.records_json,
        &json_export(outputs.records, parties, generated_at),
    )?;
    tracing::info!(path = %paths.records_json.display(), "JSON export written");

    write_json(&paths.data_dictionary, &data_dictionary())?;
    tracing::info!(path = %paths.data_dictionary.display(), "Data dictionary written");

    let statement = compliance_statement(&ComplianceFacts {
        parties,
        generated_at,
        total_pois: outputs.records.len(),
        accuracy_pct: outputs.report.summary.accuracy_pct,
        sampling_rate_pct: outputs.kpi.sampling_rate_pct,
    });
    fs::write(&paths.compliance_statement, statement)
        .with_context(|| format!("writing {}", paths.compliance_statement.display()))?;
    tracing::info!(path = %paths.compliance_statement.display(), "Compliance statement written");

    tracing::info!(dir = %dir.display(), "Delivery package ready");
    Ok(paths)
}
