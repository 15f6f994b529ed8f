//! Alert synthesis, snapshot assembly and the end-to-end pipeline.
//!
//! # Modules
//!
//! - [`enricher`]: Upstream plus threshold-derived alerts
//! - [`validator`]: Invariant enforcement and snapshot assembly
//! - [`pipeline`]: Raw payloads to validated snapshot

pub mod enricher;
pub mod pipeline;
pub mod validator;

pub use enricher::AlertEnricher;
pub use pipeline::{transform_operational_data, OperationalPipeline, PipelineOutcome, RawInputs};
pub use validator::{SnapshotParts, SnapshotValidator, ValidationResult, ValidationStats};
