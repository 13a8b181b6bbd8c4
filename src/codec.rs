//! Extended JSON codec.
//!
//! Translates between [`Value`] trees and their portable tagged-JSON form:
//! values plain JSON cannot express are wrapped in single-`$`-key objects
//! (`$oid`, `$date`, `$numberDecimal`, `$numberDouble`, `$numberInt`,
//! `$numberLong`, `$timestamp`). Encoding and decoding are pure transforms
//! with no I/O; field order is preserved on both sides.
//!
//! Tag detection takes precedence over generic object recursion: a document
//! whose own field is literally named `$oid` is indistinguishable from an
//! encoded identifier and will decode as one. This is a known ambiguity of
//! the format, not resolved by namespacing.

use crate::error::{Error, Result};
use crate::value::{Document, ObjectId, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value as Json};

/// Tag keys probed on decode, in fixed order. The first one present wins.
const TAGS: [&str; 7] = [
    "$oid",
    "$date",
    "$numberDecimal",
    "$numberDouble",
    "$numberInt",
    "$numberLong",
    "$timestamp",
];

// =============================================================================
// Encoding
// =============================================================================

/// Encode a sequence of documents as a JSON array, ready for a snapshot file.
#[must_use]
pub fn encode_documents(documents: &[Document]) -> Json {
    Json::Array(documents.iter().map(encode_document).collect())
}

/// Encode one document, preserving field order.
#[must_use]
pub fn encode_document(document: &Document) -> Json {
    let mut map = Map::new();
    for (key, value) in document {
        map.insert(key.clone(), encode_value(value));
    }
    Json::Object(map)
}

/// Encode a single value into its extended-JSON form.
#[must_use]
pub fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::Number(n.clone()),
        Value::String(s) => Json::String(s.clone()),
        Value::ObjectId(oid) => tagged("$oid", Json::String(oid.as_hex().to_string())),
        Value::Date(dt) => tagged(
            "$date",
            Json::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ),
        Value::Decimal128(s) => tagged("$numberDecimal", Json::String(s.clone())),
        Value::Double(d) => tagged("$numberDouble", encode_double(*d)),
        Value::Int32(i) => tagged("$numberInt", Json::Number(Number::from(*i))),
        Value::Int64(i) => tagged("$numberLong", Json::String(i.to_string())),
        Value::Timestamp { time, increment } => {
            let mut pair = Map::new();
            pair.insert("t".to_string(), Json::Number(Number::from(*time)));
            pair.insert("i".to_string(), Json::Number(Number::from(*increment)));
            tagged("$timestamp", Json::Object(pair))
        }
        Value::Array(items) => Json::Array(items.iter().map(encode_value).collect()),
        Value::Document(doc) => encode_document(doc),
    }
}

fn tagged(tag: &str, payload: Json) -> Json {
    let mut map = Map::new();
    map.insert(tag.to_string(), payload);
    Json::Object(map)
}

// JSON has no NaN/Infinity literals, so non-finite doubles fall back to the
// canonical extended-JSON string spellings.
fn encode_double(d: f64) -> Json {
    match Number::from_f64(d) {
        Some(n) => Json::Number(n),
        None if d.is_nan() => Json::String("NaN".to_string()),
        None if d > 0.0 => Json::String("Infinity".to_string()),
        None => Json::String("-Infinity".to_string()),
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode the elements of a snapshot array back into documents.
///
/// Fails with [`Error::MalformedExtendedValue`] on the first element that is
/// not an object or carries an invalid tag payload; the error names the
/// offending field path.
pub fn decode_documents(elements: &[Json]) -> Result<Vec<Document>> {
    elements
        .iter()
        .enumerate()
        .map(|(i, element)| decode_document(element, &format!("$[{i}]")))
        .collect()
}

/// Decode one value. The inverse of [`encode_value`].
pub fn decode_value(json: &Json) -> Result<Value> {
    decode_value_at(json, "$")
}

fn decode_document(json: &Json, path: &str) -> Result<Document> {
    match decode_value_at(json, path)? {
        Value::Document(doc) => Ok(doc),
        _ => Err(Error::MalformedExtendedValue {
            path: path.to_string(),
            reason: "expected a document object".to_string(),
        }),
    }
}

fn decode_value_at(json: &Json, path: &str) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(n) => Ok(Value::Number(n.clone())),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_value_at(item, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Json::Object(map) => {
            // Tagged object? Terminal - sibling keys are ignored.
            if let Some(tag) = TAGS.iter().find(|t| map.contains_key(**t)) {
                return decode_tagged(tag, &map[*tag], path);
            }
            let mut doc = Document::new();
            for (key, value) in map {
                doc.insert(key.clone(), decode_value_at(value, &format!("{path}.{key}"))?);
            }
            Ok(Value::Document(doc))
        }
    }
}

fn decode_tagged(tag: &str, payload: &Json, path: &str) -> Result<Value> {
    let malformed = |reason: String| Error::MalformedExtendedValue {
        path: path.to_string(),
        reason,
    };

    match tag {
        "$oid" => {
            let hex = payload
                .as_str()
                .ok_or_else(|| malformed("\"$oid\" payload is not a string".into()))?;
            ObjectId::parse(hex)
                .map(Value::ObjectId)
                .ok_or_else(|| malformed(format!("\"$oid\" is not a 24-character hex string: {hex:?}")))
        }
        "$date" => {
            let text = payload
                .as_str()
                .ok_or_else(|| malformed("\"$date\" payload is not a string".into()))?;
            DateTime::parse_from_rfc3339(text)
                .map(|dt| Value::Date(dt.with_timezone(&Utc)))
                .map_err(|e| malformed(format!("\"$date\" is not an ISO-8601 instant: {e}")))
        }
        "$numberDecimal" => {
            let text = payload
                .as_str()
                .ok_or_else(|| malformed("\"$numberDecimal\" payload is not a string".into()))?;
            if text.trim().is_empty() || text.trim().parse::<f64>().is_err() {
                return Err(malformed(format!(
                    "\"$numberDecimal\" is not a decimal string: {text:?}"
                )));
            }
            Ok(Value::Decimal128(text.to_string()))
        }
        "$numberDouble" => decode_double(payload)
            .map(Value::Double)
            .ok_or_else(|| malformed(format!("\"$numberDouble\" is not a number: {payload}"))),
        "$numberInt" => decode_i64(payload)
            .and_then(|i| i32::try_from(i).ok())
            .map(Value::Int32)
            .ok_or_else(|| malformed(format!("\"$numberInt\" is not a 32-bit integer: {payload}"))),
        "$numberLong" => decode_i64(payload)
            .map(Value::Int64)
            .ok_or_else(|| malformed(format!("\"$numberLong\" is not a 64-bit integer: {payload}"))),
        "$timestamp" => {
            let pair = payload
                .as_object()
                .ok_or_else(|| malformed("\"$timestamp\" payload is not an object".into()))?;
            let field = |name: &str| -> Result<u32> {
                pair.get(name)
                    .and_then(Json::as_u64)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| {
                        malformed(format!("\"$timestamp\".{name} is not an unsigned 32-bit integer"))
                    })
            };
            Ok(Value::Timestamp {
                time: field("t")?,
                increment: field("i")?,
            })
        }
        _ => unreachable!("unknown tag {tag}"),
    }
}

// The writer side emits numbers for these tags, but the canonical extended
// JSON format uses strings; accept both.
fn decode_double(payload: &Json) -> Option<f64> {
    match payload {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn decode_i64(payload: &Json) -> Option<i64> {
    match payload {
        Json::Number(n) => n.as_i64(),
        Json::String(s) => s.parse().ok(),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
