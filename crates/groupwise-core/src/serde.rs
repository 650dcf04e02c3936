//! Serde helpers for persisted documents.
//!
//! Older data files store references as empty strings and timestamps in the
//! `YYYY-MM-DD HH:MM:SS` layout; both are accepted when reading.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// Layout used by data files written before RFC 3339 timestamps.
pub const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Deserializes an optional identifier, treating `""` as absent.
pub fn deserialize_optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserializes an RFC 3339 timestamp, falling back to the legacy layout
/// (read as UTC).
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, LEGACY_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        reference: Option<u32>,
        #[serde(deserialize_with = "deserialize_timestamp")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_empty_reference_is_none() {
        let row: Row =
            serde_json::from_str(r#"{"reference": "", "at": "2024-01-02T03:04:05Z"}"#).unwrap();
        assert_eq!(row.reference, None);
    }

    #[test]
    fn test_null_and_missing_reference_is_none() {
        let row: Row =
            serde_json::from_str(r#"{"reference": null, "at": "2024-01-02T03:04:05Z"}"#).unwrap();
        assert_eq!(row.reference, None);

        let row: Row = serde_json::from_str(r#"{"at": "2024-01-02T03:04:05Z"}"#).unwrap();
        assert_eq!(row.reference, None);
    }

    #[test]
    fn test_reference_parses() {
        let row: Row =
            serde_json::from_str(r#"{"reference": "42", "at": "2024-01-02T03:04:05Z"}"#).unwrap();
        assert_eq!(row.reference, Some(42));
    }

    #[test]
    fn test_legacy_timestamp_is_accepted() {
        let row: Row = serde_json::from_str(r#"{"at": "2023-11-05 14:30:00"}"#).unwrap();
        assert_eq!(row.at.year(), 2023);
        assert_eq!(row.at.month(), 11);
        assert_eq!(row.at.hour(), 14);
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"at": "yesterday"}"#).is_err());
    }
}
