#[cfg(test)]
mod tests {
    use crate::error::PipelineError;
    use crate::parsing::payload::{
        decode_payload, inspect_payload, normalize_payload, normalize_value, DecodeMode,
        PayloadStatus,
    };
    use serde_json::json;

    /// Absent and blank input are empty mappings, not errors
    #[test]
    fn test_absent_and_blank_input() {
        assert!(normalize_payload(None, DecodeMode::Nested).is_empty());
        assert!(normalize_payload(Some(""), DecodeMode::Nested).is_empty());
        assert!(normalize_payload(Some("   \n"), DecodeMode::Nested).is_empty());

        let (_, status) = inspect_payload(Some(""), DecodeMode::Nested);
        assert_eq!(status, PayloadStatus::Absent);
    }

    /// Invalid JSON never raises from the normalizer
    #[test]
    fn test_malformed_json_is_empty_mapping() {
        let payload = normalize_payload(Some("{\"current_temp\": -9.7,"), DecodeMode::Nested);
        assert!(payload.is_empty());

        let (payload, status) = inspect_payload(Some("definitely not json"), DecodeMode::Flat);
        assert!(payload.is_empty());
        assert!(status.is_malformed());
    }

    /// The fallible entry point reports the parse error
    #[test]
    fn test_decode_reports_parse_error() {
        let result = decode_payload(Some("[1, 2"), DecodeMode::Flat);
        match result {
            Err(PipelineError::Parse(msg)) => assert!(msg.contains("[1, 2")),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    /// Valid JSON that is not an object is rejected
    #[test]
    fn test_non_object_json() {
        assert!(decode_payload(Some("[1, 2, 3]"), DecodeMode::Flat).is_err());
        assert!(decode_payload(Some("42"), DecodeMode::Flat).is_err());
        assert!(normalize_payload(Some("\"text\""), DecodeMode::Nested).is_empty());
    }

    /// Nested mode unpacks string-encoded JSON one level deep
    #[test]
    fn test_nested_mode_unpacks_strings() {
        let raw = json!({
            "weather": "{\"current_temp\": -12.5, \"forecast\": \"[]\"}",
            "note": "Icy roads",
            "count": 3
        })
        .to_string();

        let payload = normalize_payload(Some(&raw), DecodeMode::Nested);
        assert_eq!(payload["weather"]["current_temp"], -12.5);
        // Only one level: the inner string stays a string
        assert_eq!(payload["weather"]["forecast"], "[]");
        assert_eq!(payload["note"], "Icy roads");
        assert_eq!(payload["count"], 3);
    }

    /// Flat mode leaves string values alone
    #[test]
    fn test_flat_mode_keeps_strings() {
        let raw = r#"{"fuel": "{\"fuel_level\": 60}"}"#;
        let payload = normalize_payload(Some(raw), DecodeMode::Flat);
        assert_eq!(payload["fuel"], "{\"fuel_level\": 60}");
    }

    /// Already-decoded objects go through the same rules
    #[test]
    fn test_normalize_value() {
        let payload = normalize_value(json!({"salt_level": "75.0"}), DecodeMode::Nested);
        assert_eq!(payload["salt_level"], 75.0);

        assert!(normalize_value(json!(["salt"]), DecodeMode::Nested).is_empty());
        assert!(normalize_value(serde_json::Value::Null, DecodeMode::Nested).is_empty());
    }

    /// Whitespace around the document is tolerated
    #[test]
    fn test_surrounding_whitespace() {
        let payload = normalize_payload(Some("\n  {\"fuel_level\": 60.0}  \n"), DecodeMode::Flat);
        assert_eq!(payload["fuel_level"], 60.0);
    }
}
