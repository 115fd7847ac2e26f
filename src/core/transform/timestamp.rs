//! Timestamp candidate detection
//!
//! A string is a timestamp candidate only when it has the exact shape
//! `YYYY-MM-DDTHH:MM:SS.mmmZ`. Dates without a time, other offsets, and other
//! fractional precisions are ordinary strings.

use chrono::{DateTime, Timelike, Utc};
use regex::Regex;
use std::sync::OnceLock;

const TIMESTAMP_PATTERN: &str =
    r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]{3}Z$";

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern is valid"))
}

/// Whether `s` has the exact timestamp candidate shape
pub fn is_timestamp_candidate(s: &str) -> bool {
    timestamp_regex().is_match(s)
}

/// Parse a timestamp candidate as a UTC instant
///
/// Returns `None` when `s` is not a candidate, or when it is one but does not
/// name a real instant (for example `2023-02-30T00:00:00.000Z`). Leap seconds
/// (`:60`) are rejected too; Firestore timestamps only allow seconds 0 to 59.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if !is_timestamp_candidate(s) {
        return None;
    }

    match DateTime::parse_from_rfc3339(s) {
        // chrono represents second 60 as a nanosecond overflow
        Ok(dt) if dt.nanosecond() >= 1_000_000_000 => {
            tracing::debug!(value = %s, "Timestamp candidate is a leap second");
            None
        }
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value = %s, error = %e, "Timestamp candidate is not a valid instant");
            None
        }
    }
}
