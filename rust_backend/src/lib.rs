//! # snowops
//!
//! Operational telemetry pipeline for snow-removal dispatch.
//!
//! Each reporting cycle, four upstream collaborators (weather, fuel, salt and
//! traffic/routing) hand over loosely structured JSON. This crate turns them
//! into one validated operational snapshot and emits it as the canonical JSON
//! document consumed by the dashboard.
//!
//! ## Features
//!
//! - **Input normalization**: Tolerates empty, malformed and doubly-encoded JSON
//! - **Transformation**: Shape-table driven weather, inventory and traffic readers
//! - **Alerts**: Upstream alerts merged with threshold-derived alerts
//! - **Validation**: Range clamping and GeoJSON checks before assembly
//! - **Emission**: Stable document layout plus a SHA-256 fingerprint
//!
//! ## Architecture
//!
//! - [`parsing`]: Payload decoding, lenient coercion and shape tables
//! - [`transformations`]: Per-source transformers
//! - [`preprocessing`]: Alert synthesis, snapshot assembly and the pipeline driver
//! - [`io`]: Document emission
//! - [`core`]: Domain types
//! - [`config`]: Defaults and thresholds
//! - [`time`]: Forecast timestamp normalization
//!
//! ## Example
//!
//! ```
//! use snowops::transform_operational_data;
//!
//! let document = transform_operational_data(
//!     Some(r#"{"current_temp": -4.0, "current_conditions": "Light snow", "accumulation": 3.0}"#),
//!     Some(r#"{"fuel_level": 60.0}"#),
//!     Some(r#"{"salt_level": 75.0}"#),
//!     None,
//! )
//! .unwrap();
//!
//! let value: serde_json::Value = serde_json::from_str(&document).unwrap();
//! assert_eq!(value["resource_data"]["salt_level"], 75.0);
//! assert_eq!(value["weather_data"]["current_conditions"], "Light snow");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod time;
pub mod transformations;

#[cfg(feature = "python")]
pub mod python;

pub use config::PipelineConfig;
pub use core::OperationalSnapshot;
pub use error::{GeometryError, PipelineError, PipelineResult};
pub use io::{document_checksum, emit_document};
pub use preprocessing::{transform_operational_data, OperationalPipeline, PipelineOutcome, RawInputs};
