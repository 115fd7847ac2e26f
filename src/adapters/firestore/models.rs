//! Firestore REST wire models
//!
//! Request and response bodies for the `documents:commit` endpoint, plus the
//! conversion from [`DocValue`] to Firestore's typed value encoding.

use crate::domain::{DocValue, DocumentWrite};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a `documents:commit` request
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub writes: Vec<Write>,
}

/// A single write; only full-document updates are issued
#[derive(Debug, Clone, Serialize)]
pub struct Write {
    pub update: Document,
}

/// Document resource with its full name
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub name: String,
    pub fields: BTreeMap<String, Value>,
}

/// Firestore typed value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    /// int64 travels as a decimal string
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayValue {
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapValue {
    pub fields: BTreeMap<String, Value>,
}

impl From<&DocValue> for Value {
    fn from(value: &DocValue) -> Self {
        match value {
            DocValue::Null => Value::NullValue(()),
            DocValue::Boolean(b) => Value::BooleanValue(*b),
            DocValue::Integer(i) => Value::IntegerValue(i.to_string()),
            DocValue::Double(d) => Value::DoubleValue(*d),
            DocValue::String(s) => Value::StringValue(s.clone()),
            DocValue::Timestamp(ts) => {
                Value::TimestampValue(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            DocValue::Array(items) => Value::ArrayValue(ArrayValue {
                values: items.iter().map(Value::from).collect(),
            }),
            DocValue::Map(fields) => Value::MapValue(MapValue {
                fields: encode_fields(fields),
            }),
        }
    }
}

/// Encode a document body
pub fn encode_fields(fields: &BTreeMap<String, DocValue>) -> BTreeMap<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), Value::from(value)))
        .collect()
}

impl Write {
    /// Full-document update under `collection_path`
    pub fn upsert(collection_path: &str, write: &DocumentWrite) -> Self {
        Write {
            update: Document {
                name: format!("{collection_path}/{}", write.document_id),
                fields: encode_fields(&write.fields),
            },
        }
    }
}

/// Body of a successful commit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    #[serde(default)]
    pub write_results: Vec<WriteResult>,

    pub commit_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub update_time: Option<String>,
}

/// Google API error envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentId;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_value_encoding() {
        let mut nested = BTreeMap::new();
        nested.insert("ok".to_string(), DocValue::Boolean(true));

        let mut fields = BTreeMap::new();
        fields.insert("none".to_string(), DocValue::Null);
        fields.insert("count".to_string(), DocValue::Integer(42));
        fields.insert("ratio".to_string(), DocValue::Double(0.5));
        fields.insert("title".to_string(), DocValue::String("Intro".to_string()));
        fields.insert(
            "createdAt".to_string(),
            DocValue::Timestamp(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()),
        );
        fields.insert(
            "tags".to_string(),
            DocValue::Array(vec![DocValue::String("a".to_string())]),
        );
        fields.insert("meta".to_string(), DocValue::Map(nested));

        let encoded = serde_json::to_value(encode_fields(&fields)).unwrap();
        assert_eq!(
            encoded,
            json!({
                "none": {"nullValue": null},
                "count": {"integerValue": "42"},
                "ratio": {"doubleValue": 0.5},
                "title": {"stringValue": "Intro"},
                "createdAt": {"timestampValue": "2024-03-15T10:30:00.000Z"},
                "tags": {"arrayValue": {"values": [{"stringValue": "a"}]}},
                "meta": {"mapValue": {"fields": {"ok": {"booleanValue": true}}}}
            })
        );
    }

    #[test]
    fn test_upsert_document_name() {
        let write = DocumentWrite {
            document_id: DocumentId::new("c1").unwrap(),
            fields: BTreeMap::new(),
        };
        let request = CommitRequest {
            writes: vec![Write::upsert(
                "projects/p/databases/(default)/documents/courses",
                &write,
            )],
        };

        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({"writes": [{"update": {
                "name": "projects/p/databases/(default)/documents/courses/c1",
                "fields": {}
            }}]})
        );
    }

    #[test]
    fn test_commit_response_parsing() {
        let body = r#"{"writeResults":[{"updateTime":"2024-03-15T10:30:00.123456Z"},{}],"commitTime":"2024-03-15T10:30:00.123456Z"}"#;
        let response: CommitResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.write_results.len(), 2);
        assert!(response.commit_time.is_some());
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"error":{"code":400,"message":"Document name is invalid","status":"INVALID_ARGUMENT"}}"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.code, Some(400));
        assert_eq!(response.error.message, "Document name is invalid");
    }
}
