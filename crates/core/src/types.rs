/// One POI record as parsed by a loader: field name to raw JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Round to two decimal places, the precision of every reported percentage
/// and monetary amount.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
