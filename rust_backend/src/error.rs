//! Error types for the snapshot pipeline.
//!
//! Most faults inside the pipeline are recovered locally (defaults plus a
//! diagnostic alert). Only [`PipelineError::Geometry`] is meant to reach the
//! orchestrator: a map cannot be rendered from invalid coordinates.

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed JSON payload: {0}")]
    Parse(String),

    #[error("Invalid map geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Snapshot assembly failed: {0}")]
    AggregateConstruction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whether the error must be surfaced to the caller instead of being
    /// replaced by a default snapshot.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Geometry(_) | PipelineError::Serialization(_))
    }
}

/// Structural or range fault in GeoJSON route geometry or incident points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("route {route}: expected a GeoJSON Feature")]
    NotAFeature { route: String },

    #[error("route {route}: Feature has no geometry object")]
    MissingGeometry { route: String },

    #[error("route {route}: geometry type must be LineString, found {found}")]
    NotLineString { route: String, found: String },

    #[error("route {route}: LineString has no coordinates array")]
    MissingCoordinates { route: String },

    #[error("route {route}: coordinates array cannot be empty")]
    EmptyCoordinates { route: String },

    #[error("route {route}: coordinate {index} must be a [longitude, latitude] pair of numbers")]
    MalformedCoordinate { route: String, index: usize },

    #[error("route {route}: coordinate {index} out of range ({longitude}, {latitude})")]
    OutOfRange {
        route: String,
        index: usize,
        longitude: f64,
        latitude: f64,
    },

    #[error("incident '{description}' out of range ({longitude}, {latitude})")]
    IncidentOutOfRange {
        description: String,
        longitude: f64,
        latitude: f64,
    },
}

impl From<toml::de::Error> for PipelineError {
    fn from(e: toml::de::Error) -> Self {
        PipelineError::Configuration(format!("Failed to parse config: {}", e))
    }
}
