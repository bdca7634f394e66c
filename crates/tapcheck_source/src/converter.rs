//! Conversion of raw JSON payloads into datasets.

use crate::SourceError;
use serde_json::Value as JsonValue;
use tapcheck_core::{DataSet, Record, Value};
use tracing::warn;

/// Converts a snapshot payload into a [`DataSet`].
///
/// Accepted shapes:
///
/// - an array of records; `null` holes left by deleted entries are skipped
/// - an object of records keyed by id; records come out in key order
/// - `null`, for an empty reference
///
/// Any other shape, or an entry that is not an object, is rejected.
pub fn payload_to_dataset(name: &str, payload: JsonValue) -> Result<DataSet, SourceError> {
    let entries: Vec<JsonValue> = match payload {
        JsonValue::Null => return Ok(DataSet::empty()),
        JsonValue::Array(items) => {
            let total = items.len();
            let kept: Vec<JsonValue> = items.into_iter().filter(|v| !v.is_null()).collect();
            if kept.len() < total {
                warn!(
                    "{}: skipped {} null entries in snapshot",
                    name,
                    total - kept.len()
                );
            }
            kept
        }
        JsonValue::Object(map) => {
            let mut entries: Vec<(String, JsonValue)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries.into_iter().map(|(_, v)| v).collect()
        }
        other => {
            return Err(SourceError::unavailable(
                name,
                format!("expected an array or object of records, got {}", json_kind(&other)),
            ));
        }
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| to_record(name, i, entry))
        .collect::<Result<Vec<_>, _>>()
        .map(DataSet::from_records)
}

fn to_record(name: &str, position: usize, entry: JsonValue) -> Result<Record, SourceError> {
    match Value::from(entry) {
        Value::Map(record) => Ok(record),
        other => Err(SourceError::unavailable(
            name,
            format!("entry {} is a {}, not a record", position, other.type_name()),
        )),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
