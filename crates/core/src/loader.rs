//! Record loaders: turn an already-read JSON document or CSV text into a
//! batch of [`Record`]s.
//!
//! No file access happens here; callers read bytes and hand over the
//! parsed document or the text.

use serde_json::Value;

use crate::error::CoreError;
use crate::field_catalog::{is_boolean_field, FIELD_LATITUDE, FIELD_LONGITUDE, LIST_FIELDS};
use crate::types::Record;

/// Input format of a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess the format from a file extension: `.csv` is CSV, anything
    /// else is JSON.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext {
            Some(e) if e.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }

    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(CoreError::Validation(format!(
                "Unknown input format: '{other}'. Valid formats: json, csv"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Extract records from a parsed JSON document.
///
/// Accepted shapes, in order of precedence:
/// - a top-level array of objects;
/// - an object with a `pois` array;
/// - an object with a `data` array;
/// - any other object, taken as a single record.
pub fn records_from_json(document: Value) -> Result<Vec<Record>, CoreError> {
    match document {
        Value::Array(items) => objects(items),
        Value::Object(mut map) => {
            for key in ["pois", "data"] {
                if matches!(map.get(key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return objects(items);
                    }
                }
            }
            Ok(vec![map])
        }
        other => Err(CoreError::InvalidInput(format!(
            "expected a JSON array or object of POI records, got {}",
            json_kind(&other)
        ))),
    }
}

fn objects(items: Vec<Value>) -> Result<Vec<Record>, CoreError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(CoreError::InvalidInput(format!(
                "record {i} is a JSON {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse CSV text (header row first) into records, applying field coercions.
///
/// - strict-boolean columns: `true/yes/1` and `false/no/0` become booleans,
///   `""/n/a/null/none` become null, anything else stays a string;
/// - `latitude`/`longitude`: parsed as numbers when possible;
/// - list columns: comma-separated text becomes a string array.
///
/// Blank rows are skipped. Quoted cells may span lines.
pub fn records_from_csv(text: &str) -> Result<Vec<Record>, CoreError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = csv_rows(text).into_iter();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| CoreError::InvalidInput("CSV is empty".into()))?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CoreError::InvalidInput("CSV header row is empty".into()));
    }

    let records = rows
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.is_empty())
                .map(|(i, header)| {
                    let raw = cells.get(i).map(String::as_str).unwrap_or("");
                    (header.clone(), coerce_cell(header, raw))
                })
                .collect::<Record>()
        })
        .collect();
    Ok(records)
}

/// Convert one CSV cell to the JSON value the validator expects.
fn coerce_cell(field: &str, raw: &str) -> Value {
    if is_boolean_field(field) {
        return match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Value::Bool(true),
            "false" | "no" | "0" => Value::Bool(false),
            "" | "n/a" | "null" | "none" => Value::Null,
            _ => Value::String(raw.to_string()),
        };
    }
    if (field == FIELD_LATITUDE || field == FIELD_LONGITUDE) && !raw.is_empty() {
        if let Some(n) = raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
        {
            return Value::Number(n);
        }
    }
    if LIST_FIELDS.contains(&field) && !raw.is_empty() {
        let items = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        return Value::Array(items);
    }
    Value::String(raw.to_string())
}

/// Scanner position within the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    /// Nothing consumed yet.
    Start,
    Unquoted,
    Quoted,
    /// A `"` inside a quoted cell: an escaped quote or the closing one.
    QuoteInQuoted,
}

/// Split CSV text into rows of cells.
///
/// Rows end at `\n`, `\r\n` or a lone `\r` outside quotes. A cell that
/// opens with `"` may hold commas, line breaks and `""` escapes; a quote
/// anywhere else is literal. Rows that are a single blank cell are dropped.
pub(crate) fn csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut state = Cell::Start;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match (state, ch) {
            (Cell::Start, '"') => state = Cell::Quoted,
            (Cell::Quoted, '"') => state = Cell::QuoteInQuoted,
            (Cell::Quoted, _) => cell.push(ch),
            (Cell::QuoteInQuoted, '"') => {
                cell.push('"');
                state = Cell::Quoted;
            }
            (_, ',') => {
                row.push(std::mem::take(&mut cell));
                state = Cell::Start;
            }
            (_, '\n' | '\r') => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                push_row(&mut rows, std::mem::take(&mut row));
                state = Cell::Start;
            }
            _ => {
                cell.push(ch);
                state = Cell::Unquoted;
            }
        }
    }

    if state != Cell::Start || !row.is_empty() {
        row.push(cell);
        push_row(&mut rows, row);
    }
    rows
}

fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    let blank = matches!(row.as_slice(), [only] if only.trim().is_empty());
    if !blank {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- InputFormat ----------------------------------------------------------

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_extension(Some("CSV")), InputFormat::Csv);
        assert_eq!(InputFormat::from_extension(Some("json")), InputFormat::Json);
        assert_eq!(InputFormat::from_extension(None), InputFormat::Json);
    }

    #[test]
    fn format_from_str() {
        assert_eq!(InputFormat::from_str_value("Csv").unwrap(), InputFormat::Csv);
        assert_matches!(InputFormat::from_str_value("xlsx"), Err(CoreError::Validation(_)));
    }

    // -- JSON -----------------------------------------------------------------

    #[test]
    fn json_top_level_array() {
        let records = records_from_json(json!([{"name_en": "A"}, {"name_en": "B"}])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name_en"], "B");
    }

    #[test]
    fn json_pois_and_data_wrappers() {
        let records = records_from_json(json!({"pois": [{"a": 1}], "_meta": {}})).unwrap();
        assert_eq!(records.len(), 1);
        let records = records_from_json(json!({"data": [{"a": 1}, {"a": 2}]})).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn json_single_object_is_one_record() {
        let records = records_from_json(json!({"name_en": "Solo"})).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name_en"], "Solo");
    }

    #[test]
    fn json_non_array_pois_key_is_a_record_field() {
        let records = records_from_json(json!({"pois": "none"})).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["pois"], "none");
    }

    #[test]
    fn json_rejects_scalars_and_non_object_items() {
        assert_matches!(records_from_json(json!(42)), Err(CoreError::InvalidInput(_)));
        assert_matches!(
            records_from_json(json!([{"a": 1}, "oops"])),
            Err(CoreError::InvalidInput(_))
        );
    }

    // -- CSV ------------------------------------------------------------------

    #[test]
    fn csv_empty_is_rejected() {
        assert_matches!(records_from_csv(""), Err(CoreError::InvalidInput(_)));
    }

    #[test]
    fn csv_header_only_is_an_empty_batch() {
        assert!(records_from_csv("global_id,name_en\n").unwrap().is_empty());
    }

    #[test]
    fn csv_coerces_booleans_coordinates_and_lists() {
        let text = "\u{feff}name_en,wifi,music,valet_parking,latitude,longitude,accepted_payment_methods\n\
                    Rose Cafe,Yes,0,maybe,24.71,abc,\"cash, mada ,\"\n";
        let records = records_from_csv(text).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r["name_en"], "Rose Cafe");
        assert_eq!(r["wifi"], json!(true));
        assert_eq!(r["music"], json!(false));
        assert_eq!(r["valet_parking"], json!("maybe"));
        assert_eq!(r["latitude"], json!(24.71));
        assert_eq!(r["longitude"], json!("abc"));
        assert_eq!(r["accepted_payment_methods"], json!(["cash", "mada"]));
    }

    #[test]
    fn csv_blank_boolean_is_null_and_short_rows_pad_empty() {
        let records = records_from_csv("wifi,email\nN/A\n").unwrap();
        assert_eq!(records[0]["wifi"], Value::Null);
        assert_eq!(records[0]["email"], json!(""));
    }

    #[test]
    fn csv_skips_blank_lines() {
        let records = records_from_csv("name_en\nA\n\n   \nB\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn csv_quoted_cells_keep_commas_escapes_and_line_breaks() {
        let rows = csv_rows("a,\"b,c\",\"say \"\"hi\"\"\",\"\"\r\nx,\"line one\r\nline two\",y\n");
        assert_eq!(
            rows,
            vec![
                vec!["a", "b,c", r#"say "hi""#, ""],
                vec!["x", "line one\r\nline two", "y"],
            ]
        );
    }

    #[test]
    fn csv_last_row_without_newline_and_trailing_empty_cell() {
        assert_eq!(csv_rows("a,b\nc,"), vec![vec!["a", "b"], vec!["c", ""]]);
    }

    #[test]
    fn csv_quote_inside_unquoted_cell_is_literal() {
        assert_eq!(csv_rows("5\" screen,ok\n"), vec![vec!["5\" screen", "ok"]]);
    }

    #[test]
    fn csv_multi_line_cell_is_one_record() {
        let text = "global_id,entrance_description,wifi\r\n\
                    g-1,\"Gate 3\nnext to pharmacy\",yes\r\n\
                    g-2,Main door,no\r\n";
        let records = records_from_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["entrance_description"], "Gate 3\nnext to pharmacy");
        assert_eq!(records[0]["wifi"], json!(true));
        assert_eq!(records[1]["global_id"], "g-2");
    }
}
