//! Data dictionary for the delivery package.
//!
//! One entry per catalog field, in [`ALL_FIELDS`] order. Requiredness comes
//! from [`REQUIRED_FIELDS`](crate::field_catalog::REQUIRED_FIELDS) and the
//! enum formats are rendered from the vocabularies, so the dictionary cannot
//! drift from what the validator enforces.

use serde::Serialize;

use crate::field_catalog::{
    is_boolean_field, is_required_field, ALL_FIELDS, VALID_LANGUAGES, VALID_PAYMENTS,
    VALID_STATUSES,
};
use crate::geo::{KSA_LAT_MAX, KSA_LAT_MIN, KSA_LON_MAX, KSA_LON_MIN};

pub const DICTIONARY_TITLE: &str = "POI Data Dictionary";
pub const DICTIONARY_VERSION: &str = "1.0";

const BOOLEAN_FORMAT: &str = "true / false ONLY";
const FREE_TEXT: &str = "Free text";
const VALID_URL: &str = "Valid URL";
const HANDLE_OR_URL: &str = "@handle or URL";

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    #[serde(rename = "UUID")]
    Uuid,
    #[serde(rename = "String")]
    Text,
    Enum,
    Float,
    #[serde(rename = "URL")]
    Url,
    #[serde(rename = "String/JSON")]
    StringOrJson,
    Array,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEntry {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub description: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataDictionary {
    pub title: &'static str,
    pub version: &'static str,
    pub total_fields: usize,
    pub required_fields: usize,
    pub fields: Vec<FieldEntry>,
}

/// Build the dictionary for every catalog field.
pub fn data_dictionary() -> DataDictionary {
    let fields: Vec<FieldEntry> = ALL_FIELDS.iter().map(|f| field_entry(f)).collect();
    DataDictionary {
        title: DICTIONARY_TITLE,
        version: DICTIONARY_VERSION,
        total_fields: fields.len(),
        required_fields: fields.iter().filter(|f| f.required).count(),
        fields,
    }
}

fn field_entry(field: &'static str) -> FieldEntry {
    let (field_type, description, format) = if is_boolean_field(field) {
        (FieldType::Boolean, title_case(field), BOOLEAN_FORMAT.to_string())
    } else {
        let (t, d, f) = describe(field);
        (t, d.to_string(), f)
    };
    FieldEntry {
        field,
        field_type,
        required: is_required_field(field),
        description,
        format,
    }
}

fn describe(field: &str) -> (FieldType, &'static str, String) {
    use FieldType::*;

    let text = |t: FieldType, d: &'static str, f: &str| (t, d, f.to_string());
    match field {
        "global_id" => text(Uuid, "Unique POI identifier", "UUID v4"),
        "name_ar" => text(Text, "POI name in Arabic", "UTF-8 Arabic text"),
        "name_en" => text(Text, "POI name in English", "UTF-8 English text"),
        "legal_name" => text(Text, "Registered legal / business name", FREE_TEXT),
        "category" => text(Text, "Primary business category", "Lowercase only"),
        "secondary_category" => text(Text, "Secondary / sub category", FREE_TEXT),
        "cuisine" => text(Text, "Cuisine type (food venues)", FREE_TEXT),
        "company_status" => (Enum, "Operating status", VALID_STATUSES.join("|")),
        "commercial_license_number" => text(Text, "CR / license number", "Numeric string"),
        "latitude" => (
            Float,
            "WGS84 latitude",
            format!("{KSA_LAT_MIN:.1}-{KSA_LAT_MAX:.1} (KSA bounds)"),
        ),
        "longitude" => (
            Float,
            "WGS84 longitude",
            format!("{KSA_LON_MIN:.1}-{KSA_LON_MAX:.1} (KSA bounds)"),
        ),
        "building_number" => text(Text, "Building number", FREE_TEXT),
        "floor_number" => text(Text, "Floor / level", FREE_TEXT),
        "entrance_description" => text(Text, "How to reach entrance", FREE_TEXT),
        "google_map_url" => text(Url, "Google Maps link", VALID_URL),
        "phone_number" => text(Text, "Contact phone", "+966XXXXXXXXX or 05XXXXXXXX"),
        "email" => text(Text, "Contact email", "Valid email"),
        "website" => text(Url, "Website URL", VALID_URL),
        "instagram" => text(Text, "Instagram handle / URL", HANDLE_OR_URL),
        "tiktok" => text(Text, "TikTok handle / URL", HANDLE_OR_URL),
        "x_account" => text(Text, "X (Twitter) handle / URL", HANDLE_OR_URL),
        "snapchat" => text(Text, "Snapchat handle / URL", HANDLE_OR_URL),
        "working_days" => text(Text, "Operating days", "e.g. All Days, Sunday-Thursday"),
        "working_hours" => text(StringOrJson, "Operating hours", "String or JSON per day"),
        "break_times" => text(StringOrJson, "Break time schedule", "String or JSON"),
        "holidays" => text(Array, "Observed holidays", "Comma-separated or JSON array"),
        "accepted_payment_methods" => (Array, "Payment methods accepted", VALID_PAYMENTS.join(",")),
        "languages_spoken" => (Array, "Staff languages", VALID_LANGUAGES.join(",")),
        "exterior_image_url" => text(Url, "Exterior photo URL", VALID_URL),
        "interior_image_url" => text(Url, "Interior photo URL", VALID_URL),
        "entrance_image_url" => text(Url, "Entrance photo URL", VALID_URL),
        "menu_image_url" => text(Url, "Menu photo URL", VALID_URL),
        "walkthrough_video_url" => text(Url, "Interior walkthrough video URL", VALID_URL),
        _ => text(Text, "", FREE_TEXT),
    }
}

/// `"women_prayer_room"` -> `"Women Prayer Room"`.
fn title_case(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
