//! Canonical JSON document for the presentation and persistence collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::core::{
    Alert, ChartSeries, FleetSnapshot, MapOverlay, OperationalSnapshot, ResourceInventory,
    RouteMetrics, WeatherSnapshot,
};
use crate::error::PipelineError;

/// Top-level keys of an emitted document, in output order.
pub const DOCUMENT_KEYS: [&str; 7] = [
    "weather_data",
    "resource_data",
    "route_data",
    "fleet_data",
    "alerts_data",
    "map_data",
    "weather_chart_data",
];

#[derive(Serialize)]
struct DocumentRef<'a> {
    weather_data: &'a WeatherSnapshot,
    resource_data: &'a ResourceInventory,
    route_data: &'a RouteMetrics,
    fleet_data: &'a FleetSnapshot,
    alerts_data: &'a [Alert],
    map_data: Option<&'a MapOverlay>,
    weather_chart_data: String,
}

impl<'a> DocumentRef<'a> {
    fn new(snapshot: &'a OperationalSnapshot) -> Result<Self, PipelineError> {
        Ok(Self {
            weather_data: snapshot.weather(),
            resource_data: snapshot.resources(),
            route_data: snapshot.routes(),
            fleet_data: snapshot.fleet(),
            alerts_data: snapshot.alerts(),
            map_data: snapshot.map(),
            weather_chart_data: serde_json::to_string(&snapshot.weather().chart_series)?,
        })
    }
}

/// An emitted document read back by a consumer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationalDocument {
    pub weather_data: WeatherSnapshot,
    pub resource_data: ResourceInventory,
    pub route_data: RouteMetrics,
    pub fleet_data: FleetSnapshot,
    pub alerts_data: Vec<Alert>,
    pub map_data: Option<MapOverlay>,
    pub weather_chart_data: String,
}

impl OperationalDocument {
    /// Decode the JSON-encoded chart series.
    pub fn chart_series(&self) -> Result<ChartSeries, PipelineError> {
        Ok(serde_json::from_str(&self.weather_chart_data)?)
    }
}

/// Serialize a snapshot as a pretty-printed document.
///
/// # Examples
///
/// ```
/// use snowops::core::OperationalSnapshot;
/// use snowops::io::emit_document;
///
/// let document = emit_document(&OperationalSnapshot::default()).unwrap();
/// assert!(document.starts_with("{\n  \"weather_data\""));
/// ```
pub fn emit_document(snapshot: &OperationalSnapshot) -> Result<String, PipelineError> {
    let document = DocumentRef::new(snapshot)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Same document as [`emit_document`], as a JSON value.
pub fn to_document_value(snapshot: &OperationalSnapshot) -> Result<Value, PipelineError> {
    let document = DocumentRef::new(snapshot)?;
    Ok(serde_json::to_value(&document)?)
}

/// Parse an emitted document, rejecting unknown keys.
pub fn read_document(content: &str) -> Result<OperationalDocument, PipelineError> {
    let deserializer = &mut serde_json::Deserializer::from_str(content);
    serde_path_to_error::deserialize(deserializer).map_err(|e| {
        PipelineError::Parse(format!("operational document at {}: {}", e.path(), e.inner()))
    })
}

/// Calculate the SHA-256 checksum of an emitted document.
///
/// # Returns
/// Hexadecimal string representation of the hash.
pub fn document_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformDefaults;

    #[test]
    fn test_top_level_keys_in_order() {
        let value = to_document_value(&OperationalSnapshot::default()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, DOCUMENT_KEYS);
    }

    #[test]
    fn test_absent_map_is_null_and_chart_is_string() {
        let value = to_document_value(&OperationalSnapshot::default()).unwrap();
        assert!(value["map_data"].is_null());

        let chart = value["weather_chart_data"].as_str().unwrap();
        let series: ChartSeries = serde_json::from_str(chart).unwrap();
        assert!(series.is_empty());

        // Chart data does not leak into the weather section
        assert!(value["weather_data"].get("chart_series").is_none());
    }

    #[test]
    fn test_read_back() {
        let snapshot = OperationalSnapshot::fallback(&TransformDefaults::default(), Some("boom"));
        let content = emit_document(&snapshot).unwrap();
        let document = read_document(&content).unwrap();

        assert_eq!(&document.resource_data, snapshot.resources());
        assert_eq!(&document.route_data, snapshot.routes());
        assert_eq!(document.alerts_data, vec![Alert::warning("boom")]);
        assert_eq!(document.map_data, None);
        assert!(document.chart_series().unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_unknown_keys() {
        let mut value = to_document_value(&OperationalSnapshot::default()).unwrap();
        value["extra"] = Value::Bool(true);
        let err = read_document(&value.to_string()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));

        let mut value = to_document_value(&OperationalSnapshot::default()).unwrap();
        value["resource_data"]["reorder_point"] = Value::from(10);
        let err = read_document(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("resource_data"));
    }

    #[test]
    fn test_checksum_consistency() {
        let content = emit_document(&OperationalSnapshot::default()).unwrap();
        let checksum1 = document_checksum(&content);
        let checksum2 = document_checksum(&content);
        assert_eq!(checksum1, checksum2);
        assert_eq!(checksum1.len(), 64);
    }

    #[test]
    fn test_different_content_different_checksum() {
        let checksum1 = document_checksum(r#"{"alerts_data": []}"#);
        let checksum2 = document_checksum(r#"{"alerts_data": [1]}"#);
        assert_ne!(checksum1, checksum2);
    }
}
