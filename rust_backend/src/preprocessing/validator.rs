//! Snapshot assembly with invariant enforcement.
//!
//! [`SnapshotValidator`] is the only place an [`OperationalSnapshot`] is built
//! from transformer output. Range violations are clamped and recorded as
//! warnings; geometry violations are errors and abort assembly.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::TransformDefaults;
use crate::core::{
    incident_code, Alert, ChartSeries, FleetSnapshot, MapOverlay, OperationalSnapshot,
    ResourceInventory, RouteMetrics, WeatherSnapshot,
};
use crate::error::PipelineError;
use crate::parsing::lenient::{clamp_finite, round1};
use crate::time::parse_timestamp;
use crate::transformations::geometry::{validate_incident, validate_line_feature};
use crate::transformations::{default_traffic, unknown_inventory};

/// Result of snapshot validation.
///
/// Errors make `is_valid` false; warnings record values that were repaired.
///
/// # Examples
///
/// ```
/// use snowops::preprocessing::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_warning("coverage clamped".to_string());
/// assert!(result.is_valid);
///
/// result.add_error("route r1: coordinate 0 out of range".to_string());
/// assert!(!result.is_valid);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Counts of repairs made during assembly.
///
/// * `clamped_values` - Numbers moved into their valid range
/// * `replaced_texts` - Empty texts replaced by a placeholder
/// * `dropped_alerts` - Alerts removed for having no message
/// * `adjusted_priorities` - Route priorities or incident codes brought into range
/// * `geometry_errors` - Route or incident geometry faults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub clamped_values: usize,
    pub replaced_texts: usize,
    pub dropped_alerts: usize,
    pub adjusted_priorities: usize,
    pub geometry_errors: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Total number of repaired values.
    pub fn repair_count(&self) -> usize {
        let stats = &self.stats;
        stats.clamped_values + stats.replaced_texts + stats.dropped_alerts + stats.adjusted_priorities
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Transformer output awaiting assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotParts {
    pub weather: WeatherSnapshot,
    pub resources: ResourceInventory,
    pub routes: RouteMetrics,
    pub fleet: FleetSnapshot,
    pub alerts: Vec<Alert>,
    pub map: Option<MapOverlay>,
}

/// Assembles [`SnapshotParts`] into an [`OperationalSnapshot`].
pub struct SnapshotValidator;

impl SnapshotValidator {
    /// Validate, repair and assemble the snapshot.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Geometry`] for invalid route geometry or incident
    ///   coordinates
    /// - [`PipelineError::AggregateConstruction`] when the parts are
    ///   inconsistent with each other (chart series not aligned with the
    ///   forecast, unparseable forecast time)
    pub fn assemble(
        parts: SnapshotParts,
    ) -> Result<(OperationalSnapshot, ValidationResult), PipelineError> {
        let mut repair = Repair::default();

        let weather = repair.weather(parts.weather)?;
        let resources = repair.resources(parts.resources);
        let routes = repair.routes(parts.routes);
        let fleet = repair.fleet(parts.fleet);
        let alerts = repair.alerts("alerts_data", parts.alerts);
        let map = match parts.map {
            Some(map) => Some(repair.map(map)?),
            None => None,
        };

        let result = repair.result;
        if !result.warnings.is_empty() {
            log::debug!("Snapshot assembled with {} repairs", result.repair_count());
        }

        Ok((
            OperationalSnapshot {
                weather,
                resources,
                routes,
                fleet,
                alerts,
                map,
            },
            result,
        ))
    }
}

/// Accumulates repairs while walking the parts.
#[derive(Default)]
struct Repair {
    result: ValidationResult,
}

impl Repair {
    fn note(&mut self, message: String) {
        log::debug!("{}", message);
        self.result.add_warning(message);
    }

    fn percent(&mut self, field: &str, value: f64) -> f64 {
        let clamped = clamp_finite(value, 0.0, 100.0);
        if clamped != value {
            self.result.stats.clamped_values += 1;
            self.note(format!("{} clamped from {} to {}", field, value, clamped));
        }
        round1(clamped)
    }

    fn non_negative(&mut self, field: &str, value: f64) -> f64 {
        if value.is_finite() && value >= 0.0 {
            return value;
        }
        self.result.stats.clamped_values += 1;
        self.note(format!("{} clamped from {} to 0", field, value));
        0.0
    }

    fn finite(&mut self, field: &str, value: f64) -> f64 {
        if value.is_finite() {
            return value;
        }
        self.result.stats.clamped_values += 1;
        self.note(format!("{} replaced non-finite {} with 0", field, value));
        0.0
    }

    fn text(&mut self, field: &str, value: String, fallback: impl FnOnce() -> String) -> String {
        if !value.trim().is_empty() {
            return value;
        }
        let replacement = fallback();
        self.result.stats.replaced_texts += 1;
        self.note(format!("{} was empty, using {:?}", field, replacement));
        replacement
    }

    fn alerts(&mut self, field: &str, alerts: Vec<Alert>) -> Vec<Alert> {
        let before = alerts.len();
        let kept: Vec<Alert> = alerts
            .into_iter()
            .filter(|alert| !alert.message.trim().is_empty())
            .collect();
        let dropped = before - kept.len();
        if dropped > 0 {
            self.result.stats.dropped_alerts += dropped;
            self.note(format!("{}: dropped {} alerts without message", field, dropped));
        }
        kept
    }

    fn weather(&mut self, weather: WeatherSnapshot) -> Result<WeatherSnapshot, PipelineError> {
        let WeatherSnapshot {
            current_temp,
            current_conditions,
            accumulation,
            forecast,
            alerts,
            chart_series,
        } = weather;

        if !chart_series.is_aligned_with(forecast.len()) {
            return Err(PipelineError::AggregateConstruction(format!(
                "chart series has {} labels for {} forecast entries",
                chart_series.len(),
                forecast.len()
            )));
        }

        let mut checked = Vec::with_capacity(forecast.len());
        for (i, mut entry) in forecast.into_iter().enumerate() {
            if parse_timestamp(&entry.time).is_none() {
                return Err(PipelineError::AggregateConstruction(format!(
                    "forecast[{}] time {:?} is not a timestamp",
                    i, entry.time
                )));
            }
            entry.snowfall = self.non_negative(&format!("forecast[{}].snowfall", i), entry.snowfall);
            entry.temp = self.finite(&format!("forecast[{}].temp", i), entry.temp);
            checked.push(entry);
        }

        let chart_series = ChartSeries {
            snowfall: checked.iter().map(|e| e.snowfall).collect(),
            temperature: checked.iter().map(|e| e.temp).collect(),
            ..chart_series
        };

        Ok(WeatherSnapshot {
            current_temp: self.finite("weather.current_temp", current_temp),
            current_conditions: self.text("weather.current_conditions", current_conditions, || {
                "No data".to_string()
            }),
            accumulation: self.non_negative("weather.accumulation", accumulation),
            forecast: checked,
            alerts: self.alerts("weather.alerts", alerts),
            chart_series,
        })
    }

    fn resources(&mut self, resources: ResourceInventory) -> ResourceInventory {
        let depots = resources
            .depots
            .into_iter()
            .enumerate()
            .map(|(i, mut depot)| {
                depot.name = self.text(&format!("depots[{}].name", i), depot.name, || {
                    "Unknown".to_string()
                });
                depot.status = self.text(&format!("depots[{}].status", i), depot.status, || {
                    "Unknown".to_string()
                });
                depot
            })
            .collect();

        ResourceInventory {
            salt_level: self.percent("salt_level", resources.salt_level),
            fuel_level: self.percent("fuel_level", resources.fuel_level),
            depots,
        }
    }

    fn routes(&mut self, mut routes: RouteMetrics) -> RouteMetrics {
        routes.coverage = self.percent("coverage", routes.coverage);

        let names: Vec<String> = routes.efficiency_scores.keys().map(str::to_string).collect();
        for (name, score) in names.iter().zip(routes.efficiency_scores.values_mut()) {
            *score = self.percent(&format!("efficiency_scores.{}", name), *score);
        }

        let names: Vec<String> = routes.priority_zones.keys().map(str::to_string).collect();
        for (name, zone) in names.iter().zip(routes.priority_zones.values_mut()) {
            zone.0 = self.percent(&format!("priority_zones.{}", name), zone.0);
        }

        routes
    }

    fn fleet(&mut self, fleet: FleetSnapshot) -> FleetSnapshot {
        let vehicles = fleet
            .vehicles
            .into_iter()
            .enumerate()
            .map(|(i, mut vehicle)| {
                vehicle.id = self.text(&format!("vehicles[{}].id", i), vehicle.id, || {
                    format!("Truck {}", i + 1)
                });
                vehicle.status = self.text(&format!("vehicles[{}].status", i), vehicle.status, || {
                    "Unknown".to_string()
                });
                vehicle.region = self.text(&format!("vehicles[{}].region", i), vehicle.region, || {
                    "Unknown".to_string()
                });
                vehicle
            })
            .collect();
        FleetSnapshot { vehicles }
    }

    fn map(&mut self, map: MapOverlay) -> Result<MapOverlay, PipelineError> {
        let mut routes = Vec::with_capacity(map.routes.len());
        for (i, mut route) in map.routes.into_iter().enumerate() {
            route.id = self.text(&format!("map.routes[{}].id", i), route.id, || {
                format!("route-{}", i + 1)
            });
            if !(1..=3).contains(&route.priority) {
                let clamped = route.priority.clamp(1, 3);
                self.result.stats.adjusted_priorities += 1;
                self.note(format!(
                    "route {} priority {} clamped to {}",
                    route.id, route.priority, clamped
                ));
                route.priority = clamped;
            }
            if let Err(e) = validate_line_feature(&route.id, &route.geometry) {
                self.result.stats.geometry_errors += 1;
                self.result.add_error(e.to_string());
                return Err(e.into());
            }
            routes.push(route);
        }

        let mut incidents = Vec::with_capacity(map.incidents.len());
        for (i, mut incident) in map.incidents.into_iter().enumerate() {
            if let Err(e) = validate_incident(&incident) {
                self.result.stats.geometry_errors += 1;
                self.result.add_error(e.to_string());
                return Err(e.into());
            }
            if incident.kind > incident_code::JAM {
                self.result.stats.adjusted_priorities += 1;
                self.note(format!(
                    "incident {} code {} replaced with {}",
                    i,
                    incident.kind,
                    incident_code::UNKNOWN
                ));
                incident.kind = incident_code::UNKNOWN;
            }
            incident.description = self.text(
                &format!("map.incidents[{}].description", i),
                incident.description,
                || "Incident".to_string(),
            );
            incidents.push(incident);
        }

        Ok(MapOverlay { routes, incidents })
    }
}

static CANONICAL_DEFAULTS: Lazy<TransformDefaults> = Lazy::new(TransformDefaults::default);

static CANONICAL_SNAPSHOT: Lazy<OperationalSnapshot> =
    Lazy::new(|| OperationalSnapshot::fallback(&CANONICAL_DEFAULTS, None));

impl OperationalSnapshot {
    /// Fully-default snapshot built from `defaults`, optionally carrying one
    /// diagnostic warning.
    pub fn fallback(defaults: &TransformDefaults, diagnostic: Option<&str>) -> Self {
        let traffic = default_traffic(defaults);
        Self {
            weather: WeatherSnapshot {
                current_temp: 0.0,
                current_conditions: "No data".to_string(),
                accumulation: 0.0,
                forecast: Vec::new(),
                alerts: Vec::new(),
                chart_series: ChartSeries::default(),
            },
            resources: unknown_inventory(defaults),
            routes: traffic.routes,
            fleet: traffic.fleet,
            alerts: diagnostic
                .map(|message| Alert::warning(message))
                .into_iter()
                .collect(),
            map: None,
        }
    }
}

impl OperationalSnapshot {
    /// Default snapshot for `defaults`, with an optional diagnostic warning.
    ///
    /// Stock defaults reuse the canonical snapshot; custom defaults are
    /// built through [`OperationalSnapshot::fallback`].
    pub fn default_for(defaults: &TransformDefaults, diagnostic: Option<&str>) -> Self {
        let mut snapshot = if *defaults == *CANONICAL_DEFAULTS {
            CANONICAL_SNAPSHOT.clone()
        } else {
            Self::fallback(defaults, None)
        };
        snapshot
            .alerts
            .extend(diagnostic.map(|message| Alert::warning(message)));
        snapshot
    }
}

impl Default for OperationalSnapshot {
    /// A copy of the canonical default snapshot.
    fn default() -> Self {
        CANONICAL_SNAPSHOT.clone()
    }
}
