//! Pilot billing: per-POI price, walkthrough-video surcharge, and the
//! budget cap.
//!
//! Billing is per POI delivered, not per POI passing QA, so it reads the
//! raw records and ignores validation results entirely.

use serde::Serialize;

use crate::field_catalog::{is_filled, FIELD_WALKTHROUGH_VIDEO};
use crate::types::{round2, Record};

// ---------------------------------------------------------------------------
// Contract constants (SAR)
// ---------------------------------------------------------------------------

/// Hard ceiling on the pilot invoice.
pub const PILOT_BUDGET_CAP: f64 = 50_000.0;
/// Price per delivered POI.
pub const UNIT_PRICE_POI: f64 = 52.2;
/// Surcharge per POI carrying a walkthrough video.
pub const VIDEO_SURCHARGE: f64 = 15.0;

/// Billing outcome for one delivered batch. Amounts are in SAR, rounded
/// to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingResult {
    pub total_pois: usize,
    pub pois_with_video: usize,
    pub pois_without_video: usize,
    pub unit_price_poi: f64,
    pub video_surcharge: f64,
    pub poi_cost: f64,
    pub video_cost: f64,
    pub subtotal: f64,
    pub budget_cap: f64,
    /// Cap minus subtotal; negative when over budget.
    pub remaining_budget: f64,
    pub over_budget: bool,
    pub max_pois_within_budget: u64,
}

/// Largest POI count whose base cost fits under the cap.
pub fn max_pois_within_budget() -> u64 {
    (PILOT_BUDGET_CAP / UNIT_PRICE_POI).floor() as u64
}

/// Compute the invoice for a batch of records.
pub fn compute_billing(records: &[Record]) -> BillingResult {
    let total_pois = records.len();
    let pois_with_video = records
        .iter()
        .filter(|r| is_filled(r.get(FIELD_WALKTHROUGH_VIDEO)))
        .count();

    let poi_cost = total_pois as f64 * UNIT_PRICE_POI;
    let video_cost = pois_with_video as f64 * VIDEO_SURCHARGE;
    let subtotal = poi_cost + video_cost;

    BillingResult {
        total_pois,
        pois_with_video,
        pois_without_video: total_pois - pois_with_video,
        unit_price_poi: UNIT_PRICE_POI,
        video_surcharge: VIDEO_SURCHARGE,
        poi_cost: round2(poi_cost),
        video_cost: round2(video_cost),
        subtotal: round2(subtotal),
        budget_cap: PILOT_BUDGET_CAP,
        remaining_budget: round2(PILOT_BUDGET_CAP - subtotal),
        over_budget: subtotal > PILOT_BUDGET_CAP,
        max_pois_within_budget: max_pois_within_budget(),
    }
}
