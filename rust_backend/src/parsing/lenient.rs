//! Lenient value coercion for loosely typed upstream payloads.
//!
//! Collaborators send numbers as JSON numbers, numeric strings, or `null`.
//! These helpers accept all three and fail only on values that cannot be
//! read as a number at all.

use anyhow::{anyhow, Result};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Custom deserializer that accepts a number or a numeric string
pub fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, found {:?}", s))),
    }
}

/// Custom deserializer that accepts a string or a number rendered as text
pub fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n.to_string())),
        Some(NumberOrString::Text(s)) => Ok(Some(s)),
    }
}

/// Read a number from a JSON value.
///
/// `null` yields `Ok(None)`; numbers and numeric strings yield `Ok(Some(_))`;
/// anything else is an error naming `field`.
pub fn number(value: &Value, field: &str) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| anyhow!("{}: number {} is not representable", field, n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| anyhow!("{}: expected a number, found {:?}", field, s)),
        other => Err(anyhow!("{}: expected a number, found {}", field, other)),
    }
}

/// Read the number stored under the first present key of `keys`.
pub fn number_by_keys(obj: &Map<String, Value>, keys: &[&str]) -> Result<Option<f64>> {
    match find_by_keys(obj, keys) {
        Some((key, value)) => number(value, key),
        None => Ok(None),
    }
}

/// Read text from a JSON value; numbers are rendered, `null` is `None`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Find a value in an object by trying multiple keys
pub fn find_by_keys<'a, 'k>(
    obj: &'a Map<String, Value>,
    keys: &[&'k str],
) -> Option<(&'k str, &'a Value)> {
    for key in keys {
        if let Some(value) = obj.get(*key) {
            return Some((key, value));
        }
    }
    None
}

/// Clamp into `[min, max]`; non-finite values collapse to `min`.
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Reading {
        #[serde(default, deserialize_with = "deserialize_lenient_f64")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_lenient_text")]
        label: Option<String>,
    }

    #[test]
    fn test_number_variants() {
        assert_eq!(number(&json!(4.5), "x").unwrap(), Some(4.5));
        assert_eq!(number(&json!(" -9.72 "), "x").unwrap(), Some(-9.72));
        assert_eq!(number(&Value::Null, "x").unwrap(), None);
        assert!(number(&json!("warm"), "x").is_err());
        assert!(number(&json!([1, 2]), "x").is_err());
    }

    #[test]
    fn test_lenient_deserializers() {
        let reading: Reading = serde_json::from_value(json!({"value": "12.5", "label": 7})).unwrap();
        assert_eq!(reading.value, Some(12.5));
        assert_eq!(reading.label.as_deref(), Some("7"));

        let reading: Reading = serde_json::from_value(json!({"value": null})).unwrap();
        assert_eq!(reading.value, None);
        assert_eq!(reading.label, None);

        assert!(serde_json::from_value::<Reading>(json!({"value": "lots"})).is_err());
    }

    #[test]
    fn test_number_by_keys_order() {
        let obj = json!({"currentSpeed": 30, "speed": 40});
        let obj = obj.as_object().unwrap();
        assert_eq!(number_by_keys(obj, &["speed", "currentSpeed"]).unwrap(), Some(40.0));
        assert_eq!(number_by_keys(obj, &["averageSpeed"]).unwrap(), None);
    }

    #[test]
    fn test_clamp_and_round() {
        assert_eq!(clamp_finite(140.0, 0.0, 100.0), 100.0);
        assert_eq!(clamp_finite(f64::NAN, 0.0, 100.0), 0.0);
        assert_eq!(round1(33.333), 33.3);
        assert_eq!(round1(66.66), 66.7);
    }
}
