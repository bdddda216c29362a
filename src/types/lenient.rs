//! Forgiving deserializers for form-style input.
//!
//! Browser forms send numbers as strings and leave dates blank. Numeric
//! fields coerce anything unusable to zero; dates accept RFC 3339 or a bare
//! `YYYY-MM-DD` and treat blanks as absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Whole, non-negative count. Negative, fractional-garbage or missing input is 0.
pub fn non_negative_int<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_number)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.trunc() as u64)
        .unwrap_or(0))
}

/// Non-negative decimal. Negative or unparsable input is 0.
pub fn non_negative_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_number)
        .filter(|n| n.is_finite() && *n > 0.0)
        .unwrap_or(0.0))
}

/// Parse a timestamp from RFC 3339 or `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Optional timestamp. Blank strings and null are absent; garbage is rejected.
pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", s))),
    }
}

/// Optional count from a query string. Anything unparsable is absent.
pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(as_number)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.trunc() as u64))
}

/// Trim a free-text field; blank becomes `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
