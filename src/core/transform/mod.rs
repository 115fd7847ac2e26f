//! Value normalization
//!
//! This module converts raw JSON document bodies into [`DocValue`] trees ready
//! for the store. The only change made on the way is that timestamp candidate
//! strings (see [`timestamp`]) become native [`DocValue::Timestamp`] values.
//! Everything else keeps its shape and value.
//!
//! Recursion is unguarded: input trees come from JSON and cannot contain cycles.

pub mod timestamp;

use crate::domain::DocValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use timestamp::{is_timestamp_candidate, parse_timestamp};

/// Normalize a JSON value
///
/// # Examples
///
/// ```
/// use docseed::core::transform::normalize;
/// use docseed::domain::DocValue;
/// use serde_json::json;
///
/// let value = normalize(json!({
///     "createdAt": "2024-03-15T10:30:00.000Z",
///     "day": "2024-03-15"
/// }));
///
/// let fields = value.as_map().unwrap();
/// assert!(fields["createdAt"].as_timestamp().is_some());
/// assert_eq!(fields["day"], DocValue::String("2024-03-15".to_string()));
/// ```
pub fn normalize(value: Value) -> DocValue {
    match value {
        Value::String(s) => match parse_timestamp(&s) {
            Some(ts) => DocValue::Timestamp(ts),
            None => DocValue::String(s),
        },
        Value::Array(items) => DocValue::Array(items.into_iter().map(normalize).collect()),
        Value::Object(fields) => DocValue::Map(normalize_fields(fields)),
        scalar => DocValue::from(scalar),
    }
}

/// Normalize the top-level fields of a document body
pub fn normalize_fields(fields: Map<String, Value>) -> BTreeMap<String, DocValue> {
    fields
        .into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect()
}
