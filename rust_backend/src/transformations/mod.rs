//! Per-source transformers.
//!
//! Each transformer takes a normalized [`Payload`](crate::parsing::Payload),
//! detects its layout through a shape table and produces one typed sub-model
//! of the operational snapshot.
//!
//! # Modules
//!
//! - [`weather`]: Current conditions, forecast and chart series
//! - [`inventory`]: Fuel and salt levels with depot status
//! - [`traffic`]: Route metrics, fleet roster and map overlay
//! - [`geometry`]: GeoJSON route and incident validation
//!
//! # Example
//!
//! ```
//! use snowops::config::PipelineConfig;
//! use snowops::parsing::{normalize_payload, DecodeMode};
//! use snowops::transformations::transform_inventory;
//!
//! let config = PipelineConfig::default();
//! let fuel = normalize_payload(Some(r#"{"fuel_level": 60.0}"#), DecodeMode::Nested);
//! let salt = normalize_payload(Some(r#"{"rockSalt": 120, "treatedSalt": 40}"#), DecodeMode::Nested);
//!
//! let inventory = transform_inventory(&fuel, &salt, &config.defaults, &config.thresholds);
//! assert_eq!(inventory.fuel_level, 60.0);
//! assert_eq!(inventory.salt_level, 50.0);
//! ```

pub mod geometry;
pub mod inventory;
pub mod traffic;
pub mod weather;

#[cfg(test)]
mod traffic_tests;

pub use geometry::{parse_route_geometry, validate_incident, validate_line_feature};
pub use inventory::{transform_inventory, unknown_inventory};
pub use traffic::{default_traffic, transform_traffic, TrafficOutcome};
pub use weather::{build_chart_series, transform_weather};
