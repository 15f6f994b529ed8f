use chrono::{DateTime, Utc};

use crate::config::PipelineConfig;
use crate::core::{Alert, OperationalSnapshot};
use crate::error::PipelineError;
use crate::io::emitter::emit_document;
use crate::parsing::{inspect_payload, DecodeMode, PayloadStatus};
use crate::preprocessing::enricher::AlertEnricher;
use crate::preprocessing::validator::{SnapshotParts, SnapshotValidator, ValidationResult};
use crate::transformations::{transform_inventory, transform_traffic, transform_weather};

/// Raw collaborator payloads for one reporting cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub weather: Option<String>,
    pub fuel: Option<String>,
    pub salt: Option<String>,
    pub traffic: Option<String>,
}

impl RawInputs {
    pub fn new(
        weather: Option<&str>,
        fuel: Option<&str>,
        salt: Option<&str>,
        traffic: Option<&str>,
    ) -> Self {
        Self {
            weather: weather.map(str::to_string),
            fuel: fuel.map(str::to_string),
            salt: salt.map(str::to_string),
            traffic: traffic.map(str::to_string),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub snapshot: OperationalSnapshot,
    pub validation: ValidationResult,
}

/// Main snapshot pipeline
pub struct OperationalPipeline {
    config: PipelineConfig,
    enricher: AlertEnricher,
}

impl OperationalPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        let enricher = AlertEnricher::with_thresholds(config.thresholds.clone());
        Self { config, enricher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build a snapshot using the current time for forecast normalization
    pub fn run(&self, inputs: &RawInputs) -> Result<PipelineOutcome, PipelineError> {
        self.run_at(inputs, Utc::now())
    }

    /// Build a snapshot from raw payloads
    ///
    /// # Arguments
    /// * `inputs` - The four raw payloads, any of which may be absent
    /// * `now` - Reference time for forecast normalization
    ///
    /// # Returns
    /// A snapshot with its validation report. Only geometry faults are
    /// returned as errors; assembly faults yield the default snapshot with
    /// one diagnostic alert.
    pub fn run_at(
        &self,
        inputs: &RawInputs,
        now: DateTime<Utc>,
    ) -> Result<PipelineOutcome, PipelineError> {
        // Step 1: Normalize payloads
        let (weather_payload, weather_status) =
            inspect_payload(inputs.weather.as_deref(), DecodeMode::Nested);
        let (fuel_payload, fuel_status) = inspect_payload(inputs.fuel.as_deref(), DecodeMode::Nested);
        let (salt_payload, salt_status) = inspect_payload(inputs.salt.as_deref(), DecodeMode::Nested);
        let (traffic_payload, traffic_status) =
            inspect_payload(inputs.traffic.as_deref(), DecodeMode::Nested);

        // Step 2: Transform each source
        let defaults = &self.config.defaults;
        let weather = transform_weather(&weather_payload, &self.config.forecast, now);
        let resources =
            transform_inventory(&fuel_payload, &salt_payload, defaults, &self.config.thresholds);
        let traffic = transform_traffic(&traffic_payload, defaults, &self.config.traffic)?;

        // Step 3: Alerts, then diagnostics for undecodable payloads
        let mut alerts = self.enricher.synthesize(&weather, &resources);
        alerts.extend(diagnostics(&[
            ("Weather", &weather_status),
            ("Fuel", &fuel_status),
            ("Salt", &salt_status),
            ("Traffic", &traffic_status),
        ]));

        // Step 4: Assemble
        let parts = SnapshotParts {
            weather,
            resources,
            routes: traffic.routes,
            fleet: traffic.fleet,
            alerts,
            map: traffic.map,
        };

        let outcome = match SnapshotValidator::assemble(parts) {
            Ok((snapshot, validation)) => PipelineOutcome {
                snapshot,
                validation,
            },
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::warn!("{}; using default snapshot", e);
                let mut validation = ValidationResult::new();
                validation.add_error(e.to_string());
                PipelineOutcome {
                    snapshot: OperationalSnapshot::default_for(defaults, Some(&e.to_string())),
                    validation,
                }
            }
        };

        log::info!(
            "Operational snapshot built: {} alerts, {} active routes, {} repairs",
            outcome.snapshot.alerts().len(),
            outcome.snapshot.routes().active_routes,
            outcome.validation.repair_count()
        );
        Ok(outcome)
    }
}

impl Default for OperationalPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn diagnostics(statuses: &[(&str, &PayloadStatus)]) -> Vec<Alert> {
    statuses
        .iter()
        .filter(|(_, status)| status.is_malformed())
        .map(|(source, _)| {
            Alert::warning(format!(
                "{} payload could not be decoded; defaults applied",
                source
            ))
        })
        .collect()
}

/// Convenience function: raw payloads in, canonical document out.
///
/// # Examples
///
/// ```
/// use snowops::transform_operational_data;
///
/// let document = transform_operational_data(None, Some(r#"{"fuel_level": 60}"#), Some(""), None).unwrap();
/// let value: serde_json::Value = serde_json::from_str(&document).unwrap();
/// assert_eq!(value["resource_data"]["depots"][0]["status"], "Unknown");
/// assert!(value["map_data"].is_null());
/// ```
pub fn transform_operational_data(
    weather: Option<&str>,
    fuel: Option<&str>,
    salt: Option<&str>,
    traffic: Option<&str>,
) -> Result<String, PipelineError> {
    let pipeline = OperationalPipeline::new();
    let outcome = pipeline.run(&RawInputs::new(weather, fuel, salt, traffic))?;
    emit_document(&outcome.snapshot)
}
