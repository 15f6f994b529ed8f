//! GeoJSON route geometry validation.
//!
//! Route geometry must be a `Feature` wrapping a `LineString` with at least
//! one `[longitude, latitude]` pair, every pair within range. Unlike most
//! input faults these are never repaired: a violation is reported as a
//! [`GeometryError`] and aborts the run.

use serde_json::Value;

use crate::core::{LineFeature, MapIncident};
use crate::error::GeometryError;

pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

pub fn is_valid_longitude(lon: f64) -> bool {
    lon.is_finite() && (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&lon)
}

pub fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (LATITUDE_RANGE.0..=LATITUDE_RANGE.1).contains(&lat)
}

/// Validate a raw GeoJSON value and convert it into a [`LineFeature`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use snowops::transformations::geometry::parse_route_geometry;
///
/// let feature = json!({
///     "type": "Feature",
///     "geometry": {"type": "LineString", "coordinates": [[-71.21, 46.81], [-71.23, 46.85]]}
/// });
/// assert!(parse_route_geometry("route-1", &feature).is_ok());
///
/// let bad = json!({
///     "type": "Feature",
///     "geometry": {"type": "LineString", "coordinates": [[200.0, 46.8]]}
/// });
/// assert!(parse_route_geometry("route-2", &bad).is_err());
/// ```
pub fn parse_route_geometry(route: &str, value: &Value) -> Result<LineFeature, GeometryError> {
    let feature = value
        .as_object()
        .filter(|obj| obj.get("type").and_then(Value::as_str) == Some("Feature"))
        .ok_or_else(|| GeometryError::NotAFeature {
            route: route.to_string(),
        })?;

    let geometry = feature
        .get("geometry")
        .and_then(Value::as_object)
        .ok_or_else(|| GeometryError::MissingGeometry {
            route: route.to_string(),
        })?;

    match geometry.get("type").and_then(Value::as_str) {
        Some("LineString") => {}
        other => {
            return Err(GeometryError::NotLineString {
                route: route.to_string(),
                found: other.unwrap_or("nothing").to_string(),
            })
        }
    }

    let raw_coordinates = geometry
        .get("coordinates")
        .and_then(Value::as_array)
        .ok_or_else(|| GeometryError::MissingCoordinates {
            route: route.to_string(),
        })?;

    let mut coordinates = Vec::with_capacity(raw_coordinates.len());
    for (index, raw) in raw_coordinates.iter().enumerate() {
        let pair = raw
            .as_array()
            .filter(|pair| pair.len() == 2)
            .and_then(|pair| Some([pair[0].as_f64()?, pair[1].as_f64()?]))
            .ok_or_else(|| GeometryError::MalformedCoordinate {
                route: route.to_string(),
                index,
            })?;
        coordinates.push(pair);
    }

    let mut line = LineFeature::new(coordinates);
    if let Some(properties) = feature.get("properties").and_then(Value::as_object) {
        line.properties = properties.clone();
    }

    validate_line_feature(route, &line)?;
    Ok(line)
}

/// Check coordinate count and ranges of an already typed feature.
pub fn validate_line_feature(route: &str, feature: &LineFeature) -> Result<(), GeometryError> {
    let coordinates = &feature.geometry.coordinates;
    if coordinates.is_empty() {
        return Err(GeometryError::EmptyCoordinates {
            route: route.to_string(),
        });
    }

    for (index, [longitude, latitude]) in coordinates.iter().copied().enumerate() {
        if !is_valid_longitude(longitude) || !is_valid_latitude(latitude) {
            return Err(GeometryError::OutOfRange {
                route: route.to_string(),
                index,
                longitude,
                latitude,
            });
        }
    }

    Ok(())
}

/// Check that an incident point lies on the globe.
pub fn validate_incident(incident: &MapIncident) -> Result<(), GeometryError> {
    if is_valid_longitude(incident.longitude) && is_valid_latitude(incident.latitude) {
        Ok(())
    } else {
        Err(GeometryError::IncidentOutOfRange {
            description: incident.description.clone(),
            longitude: incident.longitude,
            latitude: incident.latitude,
        })
    }
}
