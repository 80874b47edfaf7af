//! Delivery package documents: the JSON export envelope and the compliance
//! statement that travel with the validated records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::billing::{PILOT_BUDGET_CAP, UNIT_PRICE_POI};
use crate::geo::COORDINATE_TOLERANCE_M;
use crate::sampling::KPI_ACCEPT_THRESHOLD;
use crate::types::Record;

pub const SCHEMA_VERSION: &str = "1.0";
pub const ENCODING: &str = "UTF-8";
pub const COORDINATE_SYSTEM: &str = "WGS84";

const RULE_WIDTH: usize = 80;

/// Parties to the pilot agreement, echoed into reports and the package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractParties {
    pub client: String,
    pub provider: String,
}

impl ContractParties {
    /// Name of the agreement the delivery is made under.
    pub fn agreement(&self) -> String {
        format!("{} Pilot Agreement", self.client)
    }
}

// ---------------------------------------------------------------------------
// JSON export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ExportMeta {
    pub schema_version: &'static str,
    pub encoding: &'static str,
    pub coordinate_system: &'static str,
    pub total_records: usize,
    pub contract: String,
    pub provider: String,
    pub generated_at: DateTime<Utc>,
}

/// The records as delivered, with a `_meta` block describing the export.
///
/// Records are passed through unchanged so the export loads back with the
/// `pois` wrapper the loader already accepts.
#[derive(Debug, Clone, Serialize)]
pub struct JsonExport<'a> {
    pub pois: &'a [Record],
    #[serde(rename = "_meta")]
    pub meta: ExportMeta,
}

pub fn json_export<'a>(
    records: &'a [Record],
    parties: &ContractParties,
    generated_at: DateTime<Utc>,
) -> JsonExport<'a> {
    JsonExport {
        pois: records,
        meta: ExportMeta {
            schema_version: SCHEMA_VERSION,
            encoding: ENCODING,
            coordinate_system: COORDINATE_SYSTEM,
            total_records: records.len(),
            contract: parties.agreement(),
            provider: parties.provider.clone(),
            generated_at,
        },
    }
}

// ---------------------------------------------------------------------------
// Compliance statement
// ---------------------------------------------------------------------------

/// Figures quoted by the compliance statement.
#[derive(Debug, Clone)]
pub struct ComplianceFacts<'a> {
    pub parties: &'a ContractParties,
    pub generated_at: DateTime<Utc>,
    pub total_pois: usize,
    /// Whole-batch accuracy from the validation summary.
    pub accuracy_pct: f64,
    pub sampling_rate_pct: f64,
}

/// `PASS` when the whole-batch accuracy meets the acceptance threshold.
pub fn compliance_status(accuracy_pct: f64) -> &'static str {
    if accuracy_pct >= KPI_ACCEPT_THRESHOLD {
        "PASS"
    } else {
        "REQUIRES ATTENTION"
    }
}

/// Render the plain-text compliance statement.
pub fn compliance_statement(facts: &ComplianceFacts<'_>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let title = "COMPLIANCE STATEMENT: POI PILOT DELIVERY";
    let ContractParties { client, provider } = facts.parties;

    format!(
        "{rule}
{title:^width$}
{rule}

Date:       {date}
Client:     {client}
Provider:   {provider}

This delivery package is certified to comply with the terms of the
{agreement} as follows:

1. DATA FORMAT
   - Delivery Format:    CSV and JSON (both included)
   - Encoding:           {ENCODING}
   - Coordinate System:  {COORDINATE_SYSTEM}

2. DATA INTEGRITY
   - Total POIs Delivered:  {total}
   - One POI per record:    CONFIRMED
   - No personal data:      CONFIRMED

3. QUALITY ASSURANCE
   - Sampling Inspection:   {sampling:.0}% random sampling applied
   - Accuracy Rate:         {accuracy:.2}%
   - KPI Requirement:       >= {KPI_ACCEPT_THRESHOLD:.0}%
   - Status:                {status}

4. COORDINATE TOLERANCE
   - Maximum allowed deviation: {COORDINATE_TOLERANCE_M:.0} meters
   - Coordinate system:         {COORDINATE_SYSTEM}

5. MINOR DEVIATIONS (Allowed per contract)
   - Typo in name:              Tracked and flagged
   - Coordinate error <= {COORDINATE_TOLERANCE_M:.0}m:   Accepted

6. SERVER RESIDENCY
   - Data storage:  KSA-based servers only

7. BUDGET
   - Pilot Budget Cap:     SAR {budget}
   - Unit Price Per POI:   SAR {UNIT_PRICE_POI}

{rule}
  Generated by the {provider} POI validation system.
{rule}
",
        width = RULE_WIDTH,
        date = facts.generated_at.format("%Y-%m-%d"),
        agreement = facts.parties.agreement(),
        total = facts.total_pois,
        sampling = facts.sampling_rate_pct,
        accuracy = facts.accuracy_pct,
        status = compliance_status(facts.accuracy_pct),
        budget = thousands(PILOT_BUDGET_CAP.round() as u64),
    )
}

/// `50000` -> `"50,000"`.
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    use crate::loader::records_from_json;

    fn parties() -> ContractParties {
        ContractParties {
            client: "NAVER Cloud Corporation".into(),
            provider: "Farq Technology Establishment".into(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 9, 10, 30, 0).unwrap()
    }

    // -- JSON export ----------------------------------------------------------

    #[test]
    fn export_carries_meta_block() {
        let records = records_from_json(json!([{"name_en": "A"}, {"name_en": "B"}])).unwrap();
        let value = serde_json::to_value(json_export(&records, &parties(), at())).unwrap();

        let meta = &value["_meta"];
        assert_eq!(meta["schema_version"], "1.0");
        assert_eq!(meta["encoding"], "UTF-8");
        assert_eq!(meta["coordinate_system"], "WGS84");
        assert_eq!(meta["total_records"], 2);
        assert_eq!(meta["contract"], "NAVER Cloud Corporation Pilot Agreement");
        assert_eq!(meta["provider"], "Farq Technology Establishment");
        assert_eq!(meta["generated_at"], "2025-03-09T10:30:00Z");
        assert_eq!(value["pois"][1]["name_en"], "B");
    }

    #[test]
    fn export_loads_back_through_pois_wrapper() {
        let records = records_from_json(json!([{"global_id": "x"}])).unwrap();
        let value = serde_json::to_value(json_export(&records, &parties(), at())).unwrap();
        assert_eq!(records_from_json(value).unwrap(), records);
    }

    // -- compliance statement -------------------------------------------------

    fn statement(accuracy_pct: f64) -> String {
        compliance_statement(&ComplianceFacts {
            parties: &parties(),
            generated_at: at(),
            total_pois: 120,
            accuracy_pct,
            sampling_rate_pct: 30.0,
        })
    }

    #[test]
    fn statement_quotes_run_figures() {
        let text = statement(96.5);
        assert!(text.contains("Date:       2025-03-09"));
        assert!(text.contains("Client:     NAVER Cloud Corporation"));
        assert!(text.contains("Total POIs Delivered:  120"));
        assert!(text.contains("30% random sampling applied"));
        assert!(text.contains("Accuracy Rate:         96.50%"));
        assert!(text.contains("Status:                PASS"));
        assert!(text.contains("Pilot Budget Cap:     SAR 50,000"));
        assert!(text.contains("Unit Price Per POI:   SAR 52.2"));
        assert!(text.contains("Maximum allowed deviation: 30 meters"));
    }

    #[test]
    fn statement_flags_low_accuracy() {
        assert!(statement(94.99).contains("Status:                REQUIRES ATTENTION"));
        assert_eq!(compliance_status(95.0), "PASS");
    }

    #[test]
    fn statement_is_framed_by_rules() {
        let text = statement(100.0);
        let rule = "=".repeat(RULE_WIDTH);
        assert!(text.starts_with(&rule));
        assert!(text.trim_end().ends_with(&rule));
        assert!(text.lines().all(|l| l.chars().count() <= RULE_WIDTH));
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(957), "957");
        assert_eq!(thousands(50_000), "50,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
    }
}
