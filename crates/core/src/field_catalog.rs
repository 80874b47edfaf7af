//! Contractual field catalog: required fields, strict-boolean fields, the
//! ordered full field list, enum vocabularies, and the shared "filled"
//! predicate.
//!
//! This is a compile-time schema. Changing contractual terms means editing
//! the constants here and nothing else.

use serde_json::Value;

// ---------------------------------------------------------------------------
// Well-known field names
// ---------------------------------------------------------------------------

pub const FIELD_GLOBAL_ID: &str = "global_id";
pub const FIELD_NAME_AR: &str = "name_ar";
pub const FIELD_NAME_EN: &str = "name_en";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_COMPANY_STATUS: &str = "company_status";
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_WORKING_DAYS: &str = "working_days";
pub const FIELD_WORKING_HOURS: &str = "working_hours";
pub const FIELD_PHONE_NUMBER: &str = "phone_number";
pub const FIELD_HOLIDAYS: &str = "holidays";
pub const FIELD_PAYMENT_METHODS: &str = "accepted_payment_methods";
pub const FIELD_LANGUAGES: &str = "languages_spoken";
pub const FIELD_WALKTHROUGH_VIDEO: &str = "walkthrough_video_url";

// ---------------------------------------------------------------------------
// Field sets
// ---------------------------------------------------------------------------

/// Fields every delivered POI must carry.
pub const REQUIRED_FIELDS: &[&str] = &[
    FIELD_GLOBAL_ID,
    FIELD_NAME_AR,
    FIELD_NAME_EN,
    FIELD_CATEGORY,
    FIELD_COMPANY_STATUS,
    FIELD_LATITUDE,
    FIELD_LONGITUDE,
    FIELD_WORKING_DAYS,
    FIELD_WORKING_HOURS,
];

/// Amenity flags that must hold a strict true/false value when present.
pub const BOOLEAN_FIELDS: &[&str] = &[
    "drive_thru",
    "dine_in",
    "only_delivery",
    "reservation_available",
    "require_ticket",
    "order_from_car",
    "pickup_point_exists",
    "wifi",
    "music",
    "valet_parking",
    "has_parking_lot",
    "wheelchair_accessible",
    "family_seating",
    "waiting_area",
    "private_rooms",
    "smoking_area",
    "children_area",
    "shisha_available",
    "live_sports",
    "is_landmark",
    "is_trending",
    "large_groups",
    "women_prayer_room",
    "iftar_tent",
    "iftar_menu",
    "open_suhoor",
    "free_entry",
];

/// Every catalog field in export column order.
///
/// Used as the completeness denominator and as the header of the flat
/// record CSV. The boolean block sits between the schedule fields and the
/// vocabulary lists.
pub const ALL_FIELDS: &[&str] = &[
    // --- Identity ---
    FIELD_GLOBAL_ID,
    FIELD_NAME_AR,
    FIELD_NAME_EN,
    "legal_name",
    FIELD_CATEGORY,
    "secondary_category",
    "cuisine",
    FIELD_COMPANY_STATUS,
    "commercial_license_number",
    // --- Location ---
    FIELD_LATITUDE,
    FIELD_LONGITUDE,
    "building_number",
    "floor_number",
    "entrance_description",
    "google_map_url",
    // --- Contact ---
    FIELD_PHONE_NUMBER,
    "email",
    "website",
    "instagram",
    "tiktok",
    "x_account",
    "snapchat",
    // --- Schedule ---
    FIELD_WORKING_DAYS,
    FIELD_WORKING_HOURS,
    "break_times",
    FIELD_HOLIDAYS,
    // --- Amenities ---
    "drive_thru",
    "dine_in",
    "only_delivery",
    "reservation_available",
    "require_ticket",
    "order_from_car",
    "pickup_point_exists",
    "wifi",
    "music",
    "valet_parking",
    "has_parking_lot",
    "wheelchair_accessible",
    "family_seating",
    "waiting_area",
    "private_rooms",
    "smoking_area",
    "children_area",
    "shisha_available",
    "live_sports",
    "is_landmark",
    "is_trending",
    "large_groups",
    "women_prayer_room",
    "iftar_tent",
    "iftar_menu",
    "open_suhoor",
    "free_entry",
    // --- Vocabularies ---
    FIELD_PAYMENT_METHODS,
    FIELD_LANGUAGES,
    // --- Media ---
    "exterior_image_url",
    "interior_image_url",
    "entrance_image_url",
    "menu_image_url",
    FIELD_WALKTHROUGH_VIDEO,
];

/// List-valued fields that CSV input encodes as comma-separated text.
pub const LIST_FIELDS: &[&str] = &[FIELD_PAYMENT_METHODS, FIELD_LANGUAGES, FIELD_HOLIDAYS];

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Recognized operating statuses (compared case-insensitively).
pub const VALID_STATUSES: &[&str] = &[
    "open",
    "closed",
    "temporary closed",
    "permanently closed",
    "under construction",
    "coming soon",
    "relocated",
];

/// Recognized payment methods (compared case-insensitively).
///
/// List items are matched as given: `" cash"` is not `"cash"`. Only the
/// status check trims, and the CSV loader trims list items on the way in.
pub const VALID_PAYMENTS: &[&str] = &[
    "cash",
    "mada",
    "visa",
    "mastercard",
    "apple_pay",
    "stc_pay",
    "bank_transfer",
    "other",
];

/// Recognized spoken languages (compared case-insensitively).
pub const VALID_LANGUAGES: &[&str] = &["arabic", "english", "urdu", "hindi", "tagalog", "other"];

/// String values that mean "no data" even though the cell is non-empty.
pub const EMPTY_SENTINELS: &[&str] = &["", "n/a", "na", "--", "null", "none"];

/// String spellings accepted by the strict-boolean rule.
pub const BOOLEAN_SPELLINGS: &[&str] = &["true", "false", "yes", "no", "n/a", ""];

// ---------------------------------------------------------------------------
// Membership queries
// ---------------------------------------------------------------------------

pub fn is_required_field(name: &str) -> bool {
    REQUIRED_FIELDS.contains(&name)
}

pub fn is_boolean_field(name: &str) -> bool {
    BOOLEAN_FIELDS.contains(&name)
}

pub fn is_catalog_field(name: &str) -> bool {
    ALL_FIELDS.contains(&name)
}

/// Case-insensitive membership of `value` in `vocabulary`. Surrounding
/// whitespace is significant; callers trim where the rule allows it.
pub fn in_vocabulary(value: &str, vocabulary: &[&str]) -> bool {
    let normalized = value.to_lowercase();
    vocabulary.contains(&normalized.as_str())
}

// ---------------------------------------------------------------------------
// Filled predicate
// ---------------------------------------------------------------------------

/// Check whether a value counts as meaningfully filled.
///
/// - absent and `null` are empty;
/// - strings are empty when blank or one of [`EMPTY_SENTINELS`];
/// - arrays and objects are empty when they have no elements;
/// - numbers and booleans are always filled, `0` and `false` included.
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !EMPTY_SENTINELS.contains(&s.trim().to_lowercase().as_str()),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}
