//! # Request Binding
//!
//! Turns the raw parts of a request into a typed input struct in two steps:
//!
//! 1. [`parse`] merges the JSON body, the query string and the path
//!    parameters into one `serde_json::Map`. Later sources win on a key
//!    collision, so the order is body, then query, then path. The route
//!    alone decides which resource a request addresses.
//! 2. [`bind`] deserializes that map into the input type.
//!
//! Bracketed query keys are nested: `page[number]=2` becomes
//! `{"page": {"number": "2"}}`. Query values always arrive as strings;
//! integer fields opt into string coercion with [`coerce::optional_i64`].
//!
//! Any failure here is structural and rejects the whole request before
//! validation runs.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The request could not be turned into the expected input shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("request body could not be read: {0}")]
    UnreadableBody(String),

    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("request body must be a JSON object")]
    BodyNotObject,

    #[error("query string is malformed: {0}")]
    MalformedQuery(String),

    #[error("request does not match the expected input: {0}")]
    Coercion(String),
}

/// Merge body, query parameters and path parameters into a single map.
pub fn parse(
    body: &[u8],
    path: &[(String, String)],
    query: &[(String, String)],
) -> Result<Map<String, Value>, BindError> {
    let mut merged = parse_body(body)?;

    for (key, value) in query {
        insert_nested(&mut merged, key, Value::String(value.clone()));
    }

    for (key, value) in path {
        merged.insert(key.clone(), Value::String(value.clone()));
    }

    Ok(merged)
}

/// Deserialize a merged map into `I`. Unknown keys are ignored.
pub fn bind<I: DeserializeOwned>(raw: Map<String, Value>) -> Result<I, BindError> {
    serde_json::from_value(Value::Object(raw)).map_err(|e| BindError::Coercion(e.to_string()))
}

fn parse_body(body: &[u8]) -> Result<Map<String, Value>, BindError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(BindError::BodyNotObject),
        Err(e) => Err(BindError::MalformedBody(e.to_string())),
    }
}

/// Split `page[number]` into `["page", "number"]`.
///
/// Keys without brackets, or with unbalanced ones, are kept whole.
fn key_segments(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };
    if open == 0 || !key.ends_with(']') {
        return vec![key];
    }

    let mut segments = vec![&key[..open]];
    for part in key[open + 1..key.len() - 1].split("][") {
        if part.is_empty() || part.contains('[') || part.contains(']') {
            return vec![key];
        }
        segments.push(part);
    }
    segments
}

fn insert_nested(target: &mut Map<String, Value>, key: &str, value: Value) {
    let segments = key_segments(key);
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = target;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }

    current.insert(last.to_string(), value);
}

/// Serde helpers for values that may arrive as strings.
pub mod coerce {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrText {
        Int(i64),
        Text(String),
    }

    /// Accept an integer or a string holding one. `null` binds to `None`.
    ///
    /// Use with `#[serde(default, deserialize_with = "...")]` so a missing
    /// key is also `None`.
    pub fn optional_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        match Option::<IntOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(IntOrText::Int(value)) => Ok(Some(value)),
            Some(IntOrText::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("'{}' is not an integer", text))),
        }
    }
}
