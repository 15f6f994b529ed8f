//! Input normalization for raw collaborator payloads.
//!
//! Upstream collaborators hand over JSON text that may be empty, malformed,
//! not an object, or an object whose values are themselves JSON documents
//! encoded as strings. Everything here turns that into a plain
//! [`Payload`] mapping without ever failing the pipeline.

use serde_json::{Map, Value};

use crate::error::PipelineError;

/// A decoded top-level JSON object.
pub type Payload = Map<String, Value>;

/// How deep string-encoded JSON is unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Parse the outer document only.
    Flat,
    /// Also re-parse every string-valued top-level entry, one level deep.
    #[default]
    Nested,
}

/// What happened to a raw input during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadStatus {
    /// No input, or only whitespace.
    Absent,
    /// Decoded into a mapping (possibly empty).
    Decoded,
    /// Not valid JSON, or not a JSON object.
    Malformed(String),
}

impl PayloadStatus {
    pub fn is_malformed(&self) -> bool {
        matches!(self, PayloadStatus::Malformed(_))
    }
}

/// Decode a raw payload, reporting malformed input as an error.
///
/// Absent or blank input decodes to an empty mapping.
///
/// # Examples
///
/// ```
/// use snowops::parsing::{decode_payload, DecodeMode};
///
/// let payload = decode_payload(Some(r#"{"fuel": "{\"fuel_level\": 60}"}"#), DecodeMode::Nested).unwrap();
/// assert_eq!(payload["fuel"]["fuel_level"], 60);
///
/// assert!(decode_payload(Some("{not json"), DecodeMode::Flat).is_err());
/// assert!(decode_payload(None, DecodeMode::Flat).unwrap().is_empty());
/// ```
pub fn decode_payload(raw: Option<&str>, mode: DecodeMode) -> Result<Payload, PipelineError> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(Payload::new()),
        Some(text) => text,
    };

    let value: Value = serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(80).collect();
        PipelineError::Parse(format!("{} (input starts with {:?})", e, preview))
    })?;

    into_payload(value, mode)
}

/// Decode a raw payload; malformed input becomes an empty mapping.
pub fn normalize_payload(raw: Option<&str>, mode: DecodeMode) -> Payload {
    inspect_payload(raw, mode).0
}

/// Normalize a value that was already decoded by the caller.
pub fn normalize_value(value: Value, mode: DecodeMode) -> Payload {
    into_payload(value, mode).unwrap_or_else(|e| {
        log::warn!("Discarding payload: {}", e);
        Payload::new()
    })
}

/// Decode a raw payload and report how the decoding went.
pub fn inspect_payload(raw: Option<&str>, mode: DecodeMode) -> (Payload, PayloadStatus) {
    if raw.map_or(true, |r| r.trim().is_empty()) {
        return (Payload::new(), PayloadStatus::Absent);
    }

    match decode_payload(raw, mode) {
        Ok(payload) => (payload, PayloadStatus::Decoded),
        Err(e) => {
            log::warn!("Discarding payload: {}", e);
            (Payload::new(), PayloadStatus::Malformed(e.to_string()))
        }
    }
}

fn into_payload(value: Value, mode: DecodeMode) -> Result<Payload, PipelineError> {
    let mut payload = match value {
        Value::Object(map) => map,
        other => {
            return Err(PipelineError::Parse(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    if mode == DecodeMode::Nested {
        unpack_string_values(&mut payload);
    }

    Ok(payload)
}

/// Replace string entries that hold JSON documents with the decoded value.
fn unpack_string_values(payload: &mut Payload) {
    for (key, value) in payload.iter_mut() {
        let decoded = match value {
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(decoded) => decoded,
                Err(_) => continue,
            },
            _ => continue,
        };
        log::debug!("Unpacked JSON-encoded string under '{}'", key);
        *value = decoded;
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
