//! Lenient accessors over MVT's loosely typed JSON records.

use serde_json::Value;
use time::macros::format_description;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, PrimitiveDateTime};

const UNKNOWN: &str = "Unknown";

/// Renders a JSON value the way it should appear in report text.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Returns `record[key]` as display text, or `default` when absent.
pub(crate) fn field_or(record: &Value, key: &str, default: &str) -> String {
    record
        .get(key)
        .map_or_else(|| default.to_string(), display_value)
}

/// Returns `record[key]` as display text, or `"Unknown"` when absent.
pub(crate) fn field(record: &Value, key: &str) -> String {
    field_or(record, key, UNKNOWN)
}

/// Returns the first present key among `keys` as display text.
pub(crate) fn first_field(record: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| record.get(*key))
        .map_or_else(|| UNKNOWN.to_string(), display_value)
}

/// Converts a value to a float, treating missing or malformed values as zero.
pub(crate) fn safe_numeric(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        _ => 0.0,
    }
}

/// Python-style truthiness used by MVT's own boolean-ish fields.
pub(crate) fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|number| number != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Returns the last dotted component of a bundle identifier.
pub(crate) fn bundle_display_name(bundle_id: &str) -> &str {
    bundle_id.rsplit('.').next().unwrap_or(bundle_id)
}

/// Parses the timestamp shapes MVT writes: RFC 3339 strings, naive
/// `YYYY-MM-DD HH:MM:SS[.ffffff]` strings and Unix epoch numbers.
pub(crate) fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Number(number) => {
            let seconds = number.as_f64()?;
            #[allow(clippy::cast_possible_truncation)]
            OffsetDateTime::from_unix_timestamp(seconds.trunc() as i64).ok()
        }
        Value::String(text) => parse_timestamp_text(text),
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(parsed);
    }

    let without_fraction = text.split('.').next()?.trim_end_matches('Z');
    let normalized = without_fraction.replacen('T', " ", 1);
    let naive_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

    PrimitiveDateTime::parse(&normalized, naive_format)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> String {
    let output_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

    timestamp
        .format(output_format)
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Formats a timestamp as `YYYY-MM-DD`.
pub(crate) fn format_date(timestamp: OffsetDateTime) -> String {
    let output_format = format_description!("[year]-[month]-[day]");

    timestamp
        .format(output_format)
        .unwrap_or_else(|_| timestamp.date().to_string())
}

/// Formats a whole number with `,` thousands separators.
pub(crate) fn group_thousands(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}

/// Bytes to mebibytes.
pub(crate) fn to_megabytes(bytes: f64) -> f64 {
    bytes / (1024.0 * 1024.0)
}

/// Capitalizes the first letter of every alphabetic run.
pub(crate) fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut previous_is_alphabetic = false;
    for character in text.chars() {
        if character.is_alphabetic() {
            if previous_is_alphabetic {
                titled.extend(character.to_lowercase());
            } else {
                titled.extend(character.to_uppercase());
            }
            previous_is_alphabetic = true;
        } else {
            titled.push(character);
            previous_is_alphabetic = false;
        }
    }

    titled
}
