//! Per-entity database query modules
//!
//! All functions take a `&SqlitePool` and return `aura_common::Result`.
//! Dates are stored as RFC 3339 text and list/object columns as JSON text;
//! the helpers here centralize decoding of both.

pub mod history;
pub mod library;
pub mod sessions;
pub mod songs;
pub mod taste_profiles;
pub mod users;

use aura_common::{Error, Result};
use chrono::{DateTime, Utc};

/// Decode a required RFC 3339 column
pub(crate) fn parse_datetime(column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", column, e)))
}

/// Decode a nullable RFC 3339 column
pub(crate) fn parse_opt_datetime(
    column: &str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>> {
    value.map(|s| parse_datetime(column, &s)).transpose()
}

/// Decode a JSON-text column holding a string list
pub(crate) fn parse_json_list(column: &str, value: &str) -> Result<Vec<String>> {
    serde_json::from_str(value)
        .map_err(|e| Error::Internal(format!("Failed to deserialize {}: {}", column, e)))
}

/// Decode a JSON-text column holding a free-form object
pub(crate) fn parse_json_value(column: &str, value: &str) -> Result<serde_json::Value> {
    serde_json::from_str(value)
        .map_err(|e| Error::Internal(format!("Failed to deserialize {}: {}", column, e)))
}

/// Encode a value into a JSON-text column
pub(crate) fn to_json_text<T: serde::Serialize>(column: &str, value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Internal(format!("Failed to serialize {}: {}", column, e)))
}
