//! Conversion between plain JSON and Firestore's typed `Value` encoding.
//!
//! RFC 3339 strings are stored as `timestampValue` so range filters on dates
//! compare chronologically; they come back as RFC 3339 strings.

use crate::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

pub fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => json!({
                "timestampValue": ts.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }),
            Err(_) => json!({ "stringValue": s }),
        },
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(to_firestore_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": to_firestore_fields(map) } }),
    }
}

pub fn to_firestore_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect()
}

pub fn from_firestore_value(value: &Value) -> Result<Value, StoreError> {
    let obj = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidValue(format!("expected typed value, got {}", value)))?;

    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::InvalidValue("empty typed value".to_string()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        "integerValue" => {
            // Firestore sends int64 as a decimal string.
            let parsed = match inner {
                Value::String(s) => s
                    .parse::<i64>()
                    .map_err(|e| StoreError::InvalidValue(format!("integerValue {}: {}", s, e)))?,
                Value::Number(n) => n
                    .as_i64()
                    .ok_or_else(|| StoreError::InvalidValue(format!("integerValue {}", n)))?,
                other => return Err(StoreError::InvalidValue(format!("integerValue {}", other))),
            };
            Ok(Value::from(parsed))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(from_firestore_value)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => Ok(Value::Object(from_firestore_fields(fields)?)),
            _ => Ok(Value::Object(Map::new())),
        },
        other => Err(StoreError::InvalidValue(format!("unknown value type {}", other))),
    }
}

pub fn from_firestore_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(k, v)| from_firestore_value(v).map(|v| (k.clone(), v)))
        .collect()
}
