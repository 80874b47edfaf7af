//! WGS84 coordinate checks against the KSA bounding box, haversine distance,
//! and the 30-meter tolerance audit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_catalog::{FIELD_LATITUDE, FIELD_LONGITUDE};
use crate::types::{round2, Record};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum accepted distance between a surveyed point and its reference.
pub const COORDINATE_TOLERANCE_M: f64 = 30.0;

pub const KSA_LAT_MIN: f64 = 15.0;
pub const KSA_LAT_MAX: f64 = 32.5;
pub const KSA_LON_MIN: f64 = 34.0;
pub const KSA_LON_MAX: f64 = 56.0;

pub const CODE_MISSING_COORDINATES: &str = "missing_coordinates";
pub const CODE_INVALID_COORDINATE_FORMAT: &str = "invalid_coordinate_format";
pub const CODE_ZERO_COORDINATES: &str = "zero_coordinates";
pub const CODE_LATITUDE_OUT_OF_BOUNDS: &str = "latitude_out_of_ksa_bounds";
pub const CODE_LONGITUDE_OUT_OF_BOUNDS: &str = "longitude_out_of_ksa_bounds";

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

// ---------------------------------------------------------------------------
// Coordinate parsing
// ---------------------------------------------------------------------------

/// Interpret a JSON value as a finite coordinate.
///
/// Numbers are taken as-is; strings are parsed after trimming. Anything
/// else, and non-finite results, yield `None`.
///
/// Booleans are not numbers here: `true` is a format error rather than
/// `1.0`, so it reports `invalid_coordinate_format` instead of the
/// out-of-bounds codes.
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a latitude/longitude pair and return every violated rule code.
///
/// Missing and unparseable input short-circuit with a single code. Parsed
/// coordinates may collect several codes at once.
pub fn validate_coordinates(lat: Option<&Value>, lon: Option<&Value>) -> Vec<String> {
    let (Some(lat), Some(lon)) = (present(lat), present(lon)) else {
        return vec![CODE_MISSING_COORDINATES.to_string()];
    };
    let (Some(lat), Some(lon)) = (parse_coordinate(lat), parse_coordinate(lon)) else {
        return vec![CODE_INVALID_COORDINATE_FORMAT.to_string()];
    };

    let mut errors = Vec::new();
    if lat == 0.0 && lon == 0.0 {
        errors.push(CODE_ZERO_COORDINATES.to_string());
    }
    if !(KSA_LAT_MIN..=KSA_LAT_MAX).contains(&lat) {
        errors.push(format!("{CODE_LATITUDE_OUT_OF_BOUNDS} ({lat:?})"));
    }
    if !(KSA_LON_MIN..=KSA_LON_MAX).contains(&lon) {
        errors.push(format!("{CODE_LONGITUDE_OUT_OF_BOUNDS} ({lon:?})"));
    }
    errors
}

// ---------------------------------------------------------------------------
// Tolerance audit
// ---------------------------------------------------------------------------

/// Outcome of comparing a record's coordinates with a reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceCheck {
    pub distance_m: f64,
    pub within_tolerance: bool,
}

/// Compare a record's coordinates with a reference point.
///
/// Returns `None` when any of the four inputs is missing or non-numeric.
pub fn check_coordinate_tolerance(
    record: &Record,
    reference_lat: Option<&Value>,
    reference_lon: Option<&Value>,
) -> Option<ToleranceCheck> {
    let lat = present(record.get(FIELD_LATITUDE)).and_then(parse_coordinate)?;
    let lon = present(record.get(FIELD_LONGITUDE)).and_then(parse_coordinate)?;
    let ref_lat = present(reference_lat).and_then(parse_coordinate)?;
    let ref_lon = present(reference_lon).and_then(parse_coordinate)?;

    let distance = haversine_distance(lat, lon, ref_lat, ref_lon);
    Some(ToleranceCheck {
        distance_m: round2(distance),
        within_tolerance: distance <= COORDINATE_TOLERANCE_M,
    })
}
