use crate::config::AlertThresholds;
use crate::core::{Alert, ResourceInventory, WeatherSnapshot};

/// Merges upstream weather alerts with threshold-derived alerts.
///
/// Order is fixed: upstream weather alerts, salt level, fuel level, heavy
/// accumulation, extreme cold. Nothing is deduplicated.
pub struct AlertEnricher {
    thresholds: AlertThresholds,
}

impl AlertEnricher {
    /// Create an enricher with the default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(AlertThresholds::default())
    }

    /// Create an enricher with custom thresholds
    pub fn with_thresholds(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// Build the full alert sequence for one snapshot
    pub fn synthesize(&self, weather: &WeatherSnapshot, resources: &ResourceInventory) -> Vec<Alert> {
        let mut alerts = weather.alerts.clone();

        alerts.push(self.inventory_alert("Salt", resources.salt_level));
        alerts.push(self.inventory_alert("Fuel", resources.fuel_level));

        if weather.accumulation > self.thresholds.heavy_accumulation_cm {
            alerts.push(Alert::danger(format!(
                "Heavy snow accumulation: {:.1}cm",
                weather.accumulation
            )));
        }

        if weather.current_temp < self.thresholds.extreme_cold_c {
            alerts.push(Alert::warning(format!(
                "Extreme cold temperature: {:.1}°C",
                weather.current_temp
            )));
        }

        log::debug!(
            "Synthesized {} alerts ({} upstream)",
            alerts.len(),
            weather.alerts.len()
        );
        alerts
    }

    fn inventory_alert(&self, stock: &str, level: f64) -> Alert {
        let message = format!("{} inventory at {:.1}%", stock, level);
        if level < self.thresholds.low_inventory {
            Alert::warning(message)
        } else {
            Alert::info(message)
        }
    }
}

impl Default for AlertEnricher {
    fn default() -> Self {
        Self::new()
    }
}
