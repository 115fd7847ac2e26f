//! Document value model
//!
//! [`DocValue`] is the statically typed form of a document body as the store
//! sees it. It mirrors JSON one-to-one and adds a native [`DocValue::Timestamp`]
//! variant, which JSON cannot express.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// A document field value
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Boolean(bool),
    /// Integral JSON number that fits in an `i64`
    Integer(i64),
    /// Any other JSON number
    Double(f64),
    /// JSON string
    String(String),
    /// Native instant, always UTC
    Timestamp(DateTime<Utc>),
    /// JSON array
    Array(Vec<DocValue>),
    /// JSON object
    Map(BTreeMap<String, DocValue>),
}

impl DocValue {
    /// Returns the instant if this is a timestamp
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            DocValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Returns the entries if this is a map
    pub fn as_map(&self) -> Option<&BTreeMap<String, DocValue>> {
        match self {
            DocValue::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Render back to JSON
    ///
    /// Timestamps become RFC 3339 strings with millisecond precision, so a value
    /// produced from a timestamp candidate renders to the original string.
    pub fn to_json(&self) -> Value {
        match self {
            DocValue::Null => Value::Null,
            DocValue::Boolean(b) => Value::Bool(*b),
            DocValue::Integer(i) => Value::Number((*i).into()),
            DocValue::Double(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
            DocValue::String(s) => Value::String(s.clone()),
            DocValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            DocValue::Array(items) => Value::Array(items.iter().map(DocValue::to_json).collect()),
            DocValue::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Largest integer a double holds exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<Number> for DocValue {
    fn from(n: Number) -> Self {
        if let Some(i) = n.as_i64() {
            return DocValue::Integer(i);
        }
        match n.as_f64() {
            // Integral values written as `5.0` or `1e2` are integers, as they
            // are to a JavaScript client
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
                DocValue::Integer(f as i64)
            }
            Some(f) => DocValue::Double(f),
            None => DocValue::Double(f64::NAN),
        }
    }
}

/// Structural conversion with no timestamp detection
impl From<Value> for DocValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocValue::Null,
            Value::Bool(b) => DocValue::Boolean(b),
            Value::Number(n) => n.into(),
            Value::String(s) => DocValue::String(s),
            Value::Array(items) => DocValue::Array(items.into_iter().map(DocValue::from).collect()),
            Value::Object(fields) => DocValue::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, DocValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(DocValue::from(json!(null)), DocValue::Null);
        assert_eq!(DocValue::from(json!(true)), DocValue::Boolean(true));
        assert_eq!(DocValue::from(json!(42)), DocValue::Integer(42));
        assert_eq!(DocValue::from(json!(-7)), DocValue::Integer(-7));
        assert_eq!(DocValue::from(json!(2.5)), DocValue::Double(2.5));
        assert_eq!(
            DocValue::from(json!("hello")),
            DocValue::String("hello".to_string())
        );
    }

    #[test]
    fn test_from_json_large_unsigned_is_double() {
        let value = DocValue::from(json!(u64::MAX));
        assert!(matches!(value, DocValue::Double(_)));
    }

    #[test]
    fn test_from_json_integral_floats_are_integers() {
        let parsed: Value = serde_json::from_str(r#"[5.0, 1e2, -0.0, -3.0E1, 9007199254740991.0]"#)
            .unwrap();
        assert_eq!(
            DocValue::from(parsed),
            DocValue::Array(vec![
                DocValue::Integer(5),
                DocValue::Integer(100),
                DocValue::Integer(0),
                DocValue::Integer(-30),
                DocValue::Integer(9_007_199_254_740_991),
            ])
        );
    }

    #[test]
    fn test_from_json_non_integral_or_unsafe_floats_stay_doubles() {
        let parsed: Value = serde_json::from_str(r#"[5.5, 1e-2, 1e300, 9007199254740992.0]"#)
            .unwrap();
        assert_eq!(
            DocValue::from(parsed),
            DocValue::Array(vec![
                DocValue::Double(5.5),
                DocValue::Double(0.01),
                DocValue::Double(1e300),
                DocValue::Double(9_007_199_254_740_992.0),
            ])
        );
    }

    #[test]
    fn test_from_json_nested() {
        let value = DocValue::from(json!({
            "tags": ["a", "b"],
            "meta": {"count": 3}
        }));

        let fields = value.as_map().unwrap();
        assert_eq!(
            fields["tags"],
            DocValue::Array(vec![
                DocValue::String("a".to_string()),
                DocValue::String("b".to_string())
            ])
        );
        assert_eq!(
            fields["meta"].as_map().unwrap()["count"],
            DocValue::Integer(3)
        );
    }

    #[test]
    fn test_to_json_round_trip_without_timestamps() {
        let original = json!({
            "name": "Ada",
            "score": 9.5,
            "active": false,
            "tags": [1, null, "x"]
        });
        let value = DocValue::from(original.clone());
        assert_eq!(value.to_json(), original);
    }

    #[test]
    fn test_to_json_timestamp_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let value = DocValue::Timestamp(ts);
        assert_eq!(value.to_json(), json!("2024-03-15T10:30:00.000Z"));
        assert_eq!(value.as_timestamp(), Some(&ts));
    }
}
