//! Domain models for the canonical operational snapshot.
//!
//! These types describe the typed sub-models produced by the transformers
//! (weather, inventory, routes, fleet, map) and the single
//! [`OperationalSnapshot`] assembled from them. Serialized field names are the
//! contract with the downstream report renderer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ordered::OrderedMap;

/// Severity of an operational alert.
///
/// # Examples
///
/// ```
/// use snowops::core::AlertLevel;
///
/// assert_eq!(AlertLevel::normalize("DANGER"), AlertLevel::Danger);
/// assert_eq!(AlertLevel::normalize("high"), AlertLevel::Warning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    /// Lower-cases an upstream level; anything unrecognized becomes `Warning`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "info" => AlertLevel::Info,
            "warning" => AlertLevel::Warning,
            "danger" => AlertLevel::Danger,
            _ => AlertLevel::Warning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }
}

/// A single alert shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(AlertLevel::Danger, message)
    }
}

/// Display color attached to depot, zone and vehicle statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Success,
    Warning,
    Danger,
    Info,
}

impl StatusColor {
    /// Maps an upstream color label onto the closest valid color.
    ///
    /// Valid colors are matched case-insensitively; severity words used by
    /// some collaborators (`high`, `medium`, `low`) are translated and
    /// anything else falls back to `Info`.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "success" | "low" | "green" => StatusColor::Success,
            "warning" | "medium" | "yellow" | "orange" => StatusColor::Warning,
            "danger" | "high" | "red" | "critical" => StatusColor::Danger,
            _ => StatusColor::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Success => "success",
            StatusColor::Warning => "warning",
            StatusColor::Danger => "danger",
            StatusColor::Info => "info",
        }
    }
}

/// One forecast step. `time` is always a parseable timestamp string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastEntry {
    pub time: String,
    pub snowfall: f64,
    pub temp: f64,
}

/// Chart-ready series derived from the forecast.
///
/// All four arrays have the same length as the forecast they were built from.
/// Precipitation is always zero-filled: no upstream precipitation signal
/// exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub snowfall: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when every series has exactly `n` points.
    pub fn is_aligned_with(&self, n: usize) -> bool {
        self.labels.len() == n
            && self.temperature.len() == n
            && self.precipitation.len() == n
            && self.snowfall.len() == n
    }
}

/// Current conditions, forecast and upstream alerts.
///
/// `chart_series` is derived data; it is emitted separately as
/// `weather_chart_data` and is not part of the `weather_data` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherSnapshot {
    pub current_temp: f64,
    pub current_conditions: String,
    pub accumulation: f64,
    pub forecast: Vec<ForecastEntry>,
    pub alerts: Vec<Alert>,
    #[serde(skip)]
    pub chart_series: ChartSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepotStatus {
    pub name: String,
    pub status: String,
    pub status_color: StatusColor,
}

/// Salt and fuel levels as percentages plus depot statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceInventory {
    pub salt_level: f64,
    pub fuel_level: f64,
    pub depots: Vec<DepotStatus>,
}

/// Coverage score and severity color of a priority zone.
///
/// Serialized as the two-element array `[score, "color"]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneStatus(pub f64, pub StatusColor);

impl ZoneStatus {
    pub fn score(&self) -> f64 {
        self.0
    }

    pub fn color(&self) -> StatusColor {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteMetrics {
    pub active_routes: u32,
    pub coverage: f64,
    pub efficiency_scores: OrderedMap<f64>,
    pub priority_zones: OrderedMap<ZoneStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehiclePriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleStatus {
    pub id: String,
    pub status: String,
    pub status_color: StatusColor,
    pub region: String,
    pub priority: VehiclePriority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FleetSnapshot {
    pub vehicles: Vec<VehicleStatus>,
}

/// Incident category codes used by the map renderer.
pub mod incident_code {
    pub const UNKNOWN: u8 = 0;
    pub const ACCIDENT: u8 = 1;
    pub const ROAD_CLOSED: u8 = 6;
    pub const ROAD_WORKS: u8 = 8;
    pub const JAM: u8 = 9;
}

/// A point incident on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapIncident {
    #[serde(rename = "type")]
    pub kind: u8,
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// GeoJSON `LineString` geometry with `[longitude, latitude]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "LineString")]
pub struct LineString {
    pub coordinates: Vec<[f64; 2]>,
}

/// GeoJSON `Feature` wrapping a [`LineString`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct LineFeature {
    pub geometry: LineString,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl LineFeature {
    pub fn new(coordinates: Vec<[f64; 2]>) -> Self {
        Self {
            geometry: LineString { coordinates },
            properties: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapRoute {
    pub id: String,
    pub priority: u8,
    pub geometry: LineFeature,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapOverlay {
    pub routes: Vec<MapRoute>,
    pub incidents: Vec<MapIncident>,
}

impl MapOverlay {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.incidents.is_empty()
    }
}

/// The canonical, range-validated output of one pipeline run.
///
/// Fields are private: a snapshot is only produced by
/// [`SnapshotValidator`](crate::preprocessing::SnapshotValidator) or as the
/// canonical default, and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationalSnapshot {
    pub(crate) weather: WeatherSnapshot,
    pub(crate) resources: ResourceInventory,
    pub(crate) routes: RouteMetrics,
    pub(crate) fleet: FleetSnapshot,
    pub(crate) alerts: Vec<Alert>,
    pub(crate) map: Option<MapOverlay>,
}

impl OperationalSnapshot {
    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn resources(&self) -> &ResourceInventory {
        &self.resources
    }

    pub fn routes(&self) -> &RouteMetrics {
        &self.routes
    }

    pub fn fleet(&self) -> &FleetSnapshot {
        &self.fleet
    }

    /// Upstream alerts followed by derived and diagnostic alerts.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn map(&self) -> Option<&MapOverlay> {
        self.map.as_ref()
    }
}
