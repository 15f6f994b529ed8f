//! Pipeline configuration.
//!
//! Every default value and threshold the transformers rely on lives here as
//! an explicit, immutable value passed into each transformer. Configuration
//! can be built in code or read from a TOML file:
//!
//! ```toml
//! [defaults]
//! inventory_level = 50.0
//! depot_name = "Main Depot"
//!
//! [thresholds]
//! low_inventory = 30.0
//! heavy_accumulation_cm = 20.0
//! extreme_cold_c = -20.0
//!
//! [traffic]
//! optimal_speed_kmh = 50.0
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{OrderedMap, StatusColor, ZoneStatus};
use crate::error::PipelineError;

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub defaults: TransformDefaults,
    #[serde(default)]
    pub thresholds: AlertThresholds,
    #[serde(default)]
    pub traffic: TrafficSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
}

/// Fallback values used when an input is missing, unrecognized or faulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformDefaults {
    #[serde(default = "default_inventory_level")]
    pub inventory_level: f64,
    #[serde(default = "default_depot_name")]
    pub depot_name: String,
    #[serde(default = "default_active_routes")]
    pub active_routes: u32,
    #[serde(default = "default_coverage")]
    pub coverage: f64,
    #[serde(default = "default_base_efficiency")]
    pub base_efficiency: f64,
    #[serde(default = "default_efficiency_step")]
    pub efficiency_step: f64,
    #[serde(default = "default_priority_zones")]
    pub priority_zones: OrderedMap<ZoneStatus>,
}

/// Thresholds for derived alerts and depot status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_low_inventory")]
    pub low_inventory: f64,
    #[serde(default = "default_heavy_accumulation")]
    pub heavy_accumulation_cm: f64,
    #[serde(default = "default_extreme_cold")]
    pub extreme_cold_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSettings {
    /// Speed at which a route counts as fully covered.
    #[serde(default = "default_optimal_speed")]
    pub optimal_speed_kmh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Offset applied to forecast entries labelled "later".
    #[serde(default = "default_later_offset_hours")]
    pub later_offset_hours: i64,
}

fn default_inventory_level() -> f64 {
    50.0
}

fn default_depot_name() -> String {
    "Main Depot".to_string()
}

fn default_active_routes() -> u32 {
    1
}

fn default_coverage() -> f64 {
    75.0
}

fn default_base_efficiency() -> f64 {
    85.0
}

fn default_efficiency_step() -> f64 {
    5.0
}

fn default_priority_zones() -> OrderedMap<ZoneStatus> {
    [
        ("Highway Network", ZoneStatus(80.0, StatusColor::Success)),
        ("Emergency Routes", ZoneStatus(70.0, StatusColor::Warning)),
        ("Commercial", ZoneStatus(60.0, StatusColor::Danger)),
    ]
    .into_iter()
    .collect()
}

fn default_low_inventory() -> f64 {
    30.0
}

fn default_heavy_accumulation() -> f64 {
    20.0
}

fn default_extreme_cold() -> f64 {
    -20.0
}

fn default_optimal_speed() -> f64 {
    50.0
}

/// Upper bound accepted for `forecast.later_offset_hours`.
pub const MAX_LATER_OFFSET_HOURS: i64 = 48;

fn default_later_offset_hours() -> i64 {
    3
}

impl Default for TransformDefaults {
    fn default() -> Self {
        Self {
            inventory_level: default_inventory_level(),
            depot_name: default_depot_name(),
            active_routes: default_active_routes(),
            coverage: default_coverage(),
            base_efficiency: default_base_efficiency(),
            efficiency_step: default_efficiency_step(),
            priority_zones: default_priority_zones(),
        }
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_inventory: default_low_inventory(),
            heavy_accumulation_cm: default_heavy_accumulation(),
            extreme_cold_c: default_extreme_cold(),
        }
    }
}

impl Default for TrafficSettings {
    fn default() -> Self {
        Self {
            optimal_speed_kmh: default_optimal_speed(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            later_offset_hours: default_later_offset_hours(),
        }
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(PipelineConfig)` if successful
    /// * `Err(PipelineError::Configuration)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PipelineError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse pipeline configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from the default location, or built-in defaults.
    ///
    /// Searches for `snowops.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, PipelineError> {
        match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading pipeline config from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("snowops.toml"),
            PathBuf::from("rust_backend/snowops.toml"),
            PathBuf::from("../snowops.toml"),
        ];

        candidates.into_iter().find(|p| p.exists())
    }

    /// Reject values that would make every snapshot meaningless.
    fn check(&self) -> Result<(), PipelineError> {
        if !(self.traffic.optimal_speed_kmh.is_finite() && self.traffic.optimal_speed_kmh > 0.0) {
            return Err(PipelineError::Configuration(format!(
                "traffic.optimal_speed_kmh must be positive, got {}",
                self.traffic.optimal_speed_kmh
            )));
        }
        if !(0..=MAX_LATER_OFFSET_HOURS).contains(&self.forecast.later_offset_hours) {
            return Err(PipelineError::Configuration(format!(
                "forecast.later_offset_hours must be within 0..={}, got {}",
                MAX_LATER_OFFSET_HOURS, self.forecast.later_offset_hours
            )));
        }
        if self.defaults.depot_name.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "defaults.depot_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.defaults.priority_zones.len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [thresholds]
            low_inventory = 40.0

            [traffic]
            optimal_speed_kmh = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.low_inventory, 40.0);
        assert_eq!(config.thresholds.heavy_accumulation_cm, 20.0);
        assert_eq!(config.traffic.optimal_speed_kmh, 60.0);
        assert_eq!(config.defaults.depot_name, "Main Depot");
    }

    #[test]
    fn test_priority_zones_from_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [defaults.priority_zones]
            "Downtown" = [90.0, "danger"]
            "Suburbs" = [40.0, "info"]
            "#,
        )
        .unwrap();

        let zones = &config.defaults.priority_zones;
        assert_eq!(zones.keys().collect::<Vec<_>>(), vec!["Downtown", "Suburbs"]);
        assert_eq!(zones.get("Downtown"), Some(&ZoneStatus(90.0, StatusColor::Danger)));
    }

    #[test]
    fn test_rejects_zero_reference_speed() {
        let result = PipelineConfig::from_toml_str("[traffic]\noptimal_speed_kmh = 0.0\n");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_rejects_out_of_range_later_offset() {
        for offset in ["-1", "49", "10000000000"] {
            let toml = format!("[forecast]\nlater_offset_hours = {}\n", offset);
            let result = PipelineConfig::from_toml_str(&toml);
            assert!(
                matches!(result, Err(PipelineError::Configuration(ref m)) if m.contains("later_offset_hours")),
                "offset {} accepted",
                offset
            );
        }

        let config = PipelineConfig::from_toml_str("[forecast]\nlater_offset_hours = 48\n").unwrap();
        assert_eq!(config.forecast.later_offset_hours, MAX_LATER_OFFSET_HOURS);
    }

    #[test]
    fn test_invalid_toml() {
        let result = PipelineConfig::from_toml_str("[thresholds\nlow_inventory = ");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nlater_offset_hours = 6").unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.forecast.later_offset_hours, 6);
    }

    #[test]
    fn test_missing_file() {
        let result = PipelineConfig::from_file("/nonexistent/snowops.toml");
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }
}
