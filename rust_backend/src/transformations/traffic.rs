//! Traffic payload transformation.
//!
//! Produces route metrics, a synthetic fleet roster and an optional map
//! overlay from whatever the traffic collaborator sent. Four layouts are
//! recognized (see [`TrafficShape`]).
//!
//! Faults are split in two classes:
//!
//! - invalid route geometry is returned as a [`GeometryError`] and must stop
//!   the run;
//! - everything else (type mismatches, unreadable counts) is logged and
//!   replaced by [`default_traffic`].
//!
//! Incident descriptions that cannot be parsed are skipped individually.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::config::{TrafficSettings, TransformDefaults};
use crate::core::{
    incident_code, FleetSnapshot, LineFeature, MapIncident, MapOverlay, MapRoute, OrderedMap,
    RouteMetrics, StatusColor, VehiclePriority, VehicleStatus, ZoneStatus,
};
use crate::error::GeometryError;
use crate::parsing::lenient::{clamp_finite, find_by_keys, number, number_by_keys, round1, text};
use crate::parsing::{lookup, Payload, Matcher, ShapeTable};
use crate::transformations::geometry::{parse_route_geometry, validate_incident, validate_line_feature};

/// Known traffic payload layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficShape {
    /// `routeOptimizationPlan.trafficImpactAnalysis`, optionally with routes.
    RoutePlan,
    /// Top-level `currentTrafficFlow` object.
    TrafficFlow,
    /// Raw routing collaborator report under `optimized_route`.
    OptimizedRoute,
    /// Route counts given directly.
    Summary,
}

pub const TRAFFIC_SHAPES: ShapeTable<TrafficShape> = ShapeTable::new(&[
    (
        Matcher::ObjectAt(&["routeOptimizationPlan", "trafficImpactAnalysis"]),
        TrafficShape::RoutePlan,
    ),
    (
        Matcher::ObjectAt(&["currentTrafficFlow"]),
        TrafficShape::TrafficFlow,
    ),
    (
        Matcher::ObjectAt(&["optimized_route"]),
        TrafficShape::OptimizedRoute,
    ),
    (
        Matcher::AnyKey(&["active_routes", "coverage", "efficiency_scores", "priority_zones"]),
        TrafficShape::Summary,
    ),
]);

/// Candidate keys for the current traffic speed, in km/h
const SPEED_KEYS: &[&str] = &["speed", "currentSpeed", "current_speed", "averageSpeed"];
const INCIDENT_KEYS: &[&str] = &["incidents", "trafficIncidents"];
const CLOSURE_KEYS: &[&str] = &["roadClosures", "road_closures", "closures"];

const LATITUDE_KEYS: &[&str] = &["latitude", "lat"];
const LONGITUDE_KEYS: &[&str] = &["longitude", "lon", "lng"];
const DESCRIPTION_KEYS: &[&str] = &["description", "message", "text"];
const CATEGORY_KEYS: &[&str] = &["type", "iconCategory", "category"];

/// Highest route priority accepted by the map renderer
const MAX_ROUTE_PRIORITY: u8 = 3;

/// Route metrics, fleet and map overlay derived from one traffic payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficOutcome {
    pub routes: RouteMetrics,
    pub fleet: FleetSnapshot,
    pub map: Option<MapOverlay>,
}

/// Shape-independent signal extracted from the payload.
#[derive(Debug, Default)]
struct TrafficSignal {
    active_routes: u32,
    coverage: f64,
    /// Number of leading vehicles marked `High`; the rest are `Medium`.
    high_priority: usize,
    routes: Vec<MapRoute>,
    incidents: Vec<MapIncident>,
}

/// Transform a normalized traffic payload.
///
/// # Errors
///
/// Returns a [`GeometryError`] when route geometry is present but invalid.
/// Every other fault is recovered with [`default_traffic`].
///
/// # Examples
///
/// ```
/// use snowops::config::{TrafficSettings, TransformDefaults};
/// use snowops::parsing::{normalize_payload, DecodeMode};
/// use snowops::transformations::transform_traffic;
///
/// let payload = normalize_payload(
///     Some(r#"{"currentTrafficFlow": {"speed": 25, "incidents": ["Accident at 46.81, -71.22"]}}"#),
///     DecodeMode::Nested,
/// );
/// let outcome = transform_traffic(&payload, &TransformDefaults::default(), &TrafficSettings::default()).unwrap();
/// assert_eq!(outcome.routes.coverage, 50.0);
/// assert_eq!(outcome.routes.active_routes, 1);
/// assert_eq!(outcome.map.unwrap().incidents.len(), 1);
/// ```
pub fn transform_traffic(
    payload: &Payload,
    defaults: &TransformDefaults,
    settings: &TrafficSettings,
) -> Result<TrafficOutcome, GeometryError> {
    match read_traffic(payload, defaults, settings) {
        Ok(outcome) => Ok(outcome),
        Err(e) => match e.downcast::<GeometryError>() {
            Ok(geometry) => {
                log::error!("Rejecting traffic payload: {}", geometry);
                Err(geometry)
            }
            Err(e) => {
                log::warn!("Failed to transform traffic data: {:#}", e);
                Ok(default_traffic(defaults))
            }
        },
    }
}

fn read_traffic(
    payload: &Payload,
    defaults: &TransformDefaults,
    settings: &TrafficSettings,
) -> Result<TrafficOutcome> {
    let signal = match TRAFFIC_SHAPES.detect(payload) {
        Some(TrafficShape::RoutePlan) => {
            log::debug!("Traffic payload shape: route optimization plan");
            read_route_plan(payload, defaults, settings)?
        }
        Some(TrafficShape::TrafficFlow) => {
            log::debug!("Traffic payload shape: current traffic flow");
            let flow = object_at(payload, &["currentTrafficFlow"])?;
            let mut signal = read_flow(&[flow], defaults, settings)?;
            if let Some(routes) = payload.get("routes") {
                signal.routes = read_route_entries(routes, "routes")?;
            }
            signal
        }
        Some(TrafficShape::OptimizedRoute) => {
            log::debug!("Traffic payload shape: optimized route report");
            read_optimized_route(payload, defaults)?
        }
        Some(TrafficShape::Summary) | None => {
            log::debug!("Traffic payload shape: summary");
            read_summary(payload, defaults)?
        }
    };

    assemble(signal, payload, defaults)
}

fn read_route_plan(
    payload: &Payload,
    defaults: &TransformDefaults,
    settings: &TrafficSettings,
) -> Result<TrafficSignal> {
    let analysis = object_at(payload, &["routeOptimizationPlan", "trafficImpactAnalysis"])?;
    let containers = match analysis.get("currentTrafficFlow").and_then(Value::as_object) {
        Some(flow) => vec![flow, analysis],
        None => vec![analysis],
    };

    let mut signal = read_flow(&containers, defaults, settings)?;
    if let Some(routes) = lookup(payload, &["routeOptimizationPlan", "routes"]) {
        signal.routes = read_route_entries(routes, "routeOptimizationPlan.routes")?;
    }
    Ok(signal)
}

/// Speed, incidents and closures from the first container that has them.
fn read_flow(
    containers: &[&Map<String, Value>],
    defaults: &TransformDefaults,
    settings: &TrafficSettings,
) -> Result<TrafficSignal> {
    let speed = match containers.iter().find_map(|c| find_by_keys(c, SPEED_KEYS)) {
        Some((key, value)) => number(value, key)?,
        None => None,
    };
    let coverage = match speed {
        Some(speed) => round1(clamp_finite(
            speed / settings.optimal_speed_kmh * 100.0,
            0.0,
            100.0,
        )),
        None => defaults.coverage,
    };

    let (incident_count, mut incidents) =
        read_events(containers, INCIDENT_KEYS, incident_code::UNKNOWN)?;
    let (closure_count, closures) =
        read_events(containers, CLOSURE_KEYS, incident_code::ROAD_CLOSED)?;
    incidents.extend(closures);

    let active_routes = (incident_count + closure_count).max(1);

    Ok(TrafficSignal {
        active_routes: u32::try_from(active_routes).unwrap_or(u32::MAX),
        coverage,
        high_priority: incident_count,
        routes: Vec::new(),
        incidents,
    })
}

fn read_optimized_route(payload: &Payload, defaults: &TransformDefaults) -> Result<TrafficSignal> {
    let report = object_at(payload, &["optimized_route"])?;
    let raw_routes = match report.get("routes") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => bail!("optimized_route.routes: expected a list, found {}", other),
    };

    let first_length = raw_routes
        .first()
        .and_then(Value::as_object)
        .and_then(|route| route.get("summary"))
        .and_then(Value::as_object)
        .map(|summary| number_by_keys(summary, &["lengthInMeters"]))
        .transpose()?
        .flatten()
        .unwrap_or(0.0);
    let coverage = if first_length > 0.0 {
        80.0
    } else {
        defaults.coverage
    };

    let mut routes = Vec::new();
    for (index, raw) in raw_routes.iter().enumerate() {
        let route = raw
            .as_object()
            .with_context(|| format!("optimized_route.routes[{}]: expected an object", index))?;
        let id = route_id(route, index);
        if let Some(geometry) = leg_geometry(&id, route)? {
            routes.push(MapRoute {
                priority: default_priority(index),
                id,
                geometry,
            });
        }
    }

    let incident_list = lookup(payload, &["traffic_incidents", "incidents"])
        .or_else(|| payload.get("incidents"));
    let incidents = match incident_list {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| parse_incident(item, incident_code::UNKNOWN))
            .collect(),
        _ => Vec::new(),
    };

    let active_routes = raw_routes.len();
    Ok(TrafficSignal {
        active_routes: u32::try_from(active_routes).unwrap_or(u32::MAX),
        coverage,
        high_priority: active_routes,
        routes,
        incidents,
    })
}

fn read_summary(payload: &Payload, defaults: &TransformDefaults) -> Result<TrafficSignal> {
    let active_routes = number_by_keys(payload, &["active_routes"])?
        .map(route_count)
        .unwrap_or(defaults.active_routes);
    let coverage = number_by_keys(payload, &["coverage"])?
        .map(|c| round1(clamp_finite(c, 0.0, 100.0)))
        .unwrap_or(defaults.coverage);

    Ok(TrafficSignal {
        active_routes,
        coverage,
        high_priority: active_routes as usize,
        ..TrafficSignal::default()
    })
}

/// Combine a signal with upstream scores and zones into the outcome.
fn assemble(
    signal: TrafficSignal,
    payload: &Payload,
    defaults: &TransformDefaults,
) -> Result<TrafficOutcome> {
    let efficiency_scores = match upstream_scores(payload)? {
        Some(scores) => scores,
        None => synthetic_scores(signal.active_routes, defaults),
    };
    let priority_zones = match upstream_zones(payload)? {
        Some(zones) => zones,
        None => defaults.priority_zones.clone(),
    };

    let overlay = MapOverlay {
        routes: signal.routes,
        incidents: signal.incidents,
    };

    Ok(TrafficOutcome {
        routes: RouteMetrics {
            active_routes: signal.active_routes,
            coverage: signal.coverage,
            efficiency_scores,
            priority_zones,
        },
        fleet: fleet_roster(signal.active_routes, signal.high_priority),
        map: if overlay.is_empty() { None } else { Some(overlay) },
    })
}

/// Fixed traffic outcome used when the payload cannot be read.
pub fn default_traffic(defaults: &TransformDefaults) -> TrafficOutcome {
    let active_routes = defaults.active_routes;
    TrafficOutcome {
        routes: RouteMetrics {
            active_routes,
            coverage: defaults.coverage,
            efficiency_scores: synthetic_scores(active_routes, defaults),
            priority_zones: defaults.priority_zones.clone(),
        },
        fleet: fleet_roster(active_routes, active_routes as usize),
        map: Some(MapOverlay::default()),
    }
}

/// `Route i+1 -> base - i * step`; not clamped here.
pub fn synthetic_scores(active_routes: u32, defaults: &TransformDefaults) -> OrderedMap<f64> {
    (0..active_routes)
        .map(|i| {
            (
                format!("Route {}", i + 1),
                defaults.base_efficiency - f64::from(i) * defaults.efficiency_step,
            )
        })
        .collect()
}

/// One vehicle per active route; the first `high_priority` are `High`.
pub fn fleet_roster(active_routes: u32, high_priority: usize) -> FleetSnapshot {
    let vehicles = (0..active_routes as usize)
        .map(|i| VehicleStatus {
            id: format!("Truck {}", i + 1),
            status: "Active".to_string(),
            status_color: StatusColor::Success,
            region: format!("Zone {}", i + 1),
            priority: if i < high_priority {
                VehiclePriority::High
            } else {
                VehiclePriority::Medium
            },
        })
        .collect();
    FleetSnapshot { vehicles }
}

fn upstream_scores(payload: &Payload) -> Result<Option<OrderedMap<f64>>> {
    match payload.get("efficiency_scores") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(scores)) => scores
            .iter()
            .map(|(route, score)| -> Result<(String, f64)> {
                let score = number(score, route)?.unwrap_or(0.0);
                Ok((route.clone(), score))
            })
            .collect::<Result<OrderedMap<f64>>>()
            .map(Some),
        Some(other) => bail!("efficiency_scores: expected an object, found {}", other),
    }
}

fn upstream_zones(payload: &Payload) -> Result<Option<OrderedMap<ZoneStatus>>> {
    match payload.get("priority_zones") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(zones)) => zones
            .iter()
            .map(|(zone, status)| -> Result<(String, ZoneStatus)> {
                Ok((zone.clone(), zone_status(zone, status)?))
            })
            .collect::<Result<OrderedMap<ZoneStatus>>>()
            .map(Some),
        Some(other) => bail!("priority_zones: expected an object, found {}", other),
    }
}

fn zone_status(zone: &str, value: &Value) -> Result<ZoneStatus> {
    match value.as_array().map(Vec::as_slice) {
        Some([score, color]) => {
            let score = number(score, zone)?.unwrap_or(0.0);
            let color = text(color).unwrap_or_default();
            Ok(ZoneStatus(score, StatusColor::from_label(&color)))
        }
        _ => bail!("priority_zones.{}: expected [score, color], found {}", zone, value),
    }
}

/// Read route entries carrying GeoJSON geometry.
///
/// An entry is either a Feature itself or an object whose `geometry` is a
/// Feature. Entries without geometry are skipped.
fn read_route_entries(value: &Value, field: &str) -> Result<Vec<MapRoute>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => bail!("{}: expected a list, found {}", field, other),
    };

    let mut routes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let obj = entry
            .as_object()
            .with_context(|| format!("{}[{}]: expected an object", field, index))?;
        let id = route_id(obj, index);

        let feature = if obj.get("type").and_then(Value::as_str) == Some("Feature") {
            entry
        } else {
            match obj.get("geometry") {
                Some(geometry) => geometry,
                None => {
                    log::debug!("Route {} has no geometry, leaving it off the map", id);
                    continue;
                }
            }
        };

        let geometry = parse_route_geometry(&id, feature)?;
        let priority = match obj.get("priority") {
            None | Some(Value::Null) => default_priority(index),
            Some(value) => match number(value, "priority") {
                Ok(priority) => clamp_priority(priority.unwrap_or(1.0)),
                Err(e) => {
                    log::warn!("Route {}: {:#}, using default priority", id, e);
                    default_priority(index)
                }
            },
        };

        routes.push(MapRoute {
            id,
            priority,
            geometry,
        });
    }
    Ok(routes)
}

/// Build a LineString from `legs[0].points`; `None` when the route has no legs.
fn leg_geometry(route_id: &str, route: &Map<String, Value>) -> Result<Option<LineFeature>> {
    let points = match route
        .get("legs")
        .and_then(Value::as_array)
        .and_then(|legs| legs.first())
        .and_then(|leg| leg.get("points"))
    {
        Some(Value::Array(points)) => points,
        _ => return Ok(None),
    };

    let mut coordinates = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let pair = match point {
            Value::Object(obj) => number_by_keys(obj, LONGITUDE_KEYS)
                .ok()
                .flatten()
                .zip(number_by_keys(obj, LATITUDE_KEYS).ok().flatten())
                .map(|(lon, lat)| [lon, lat]),
            // Bare pairs from the routing service are [lat, lon]
            Value::Array(pair) if pair.len() == 2 => pair[1]
                .as_f64()
                .zip(pair[0].as_f64())
                .map(|(lon, lat)| [lon, lat]),
            _ => None,
        };
        let pair = pair.ok_or_else(|| GeometryError::MalformedCoordinate {
            route: route_id.to_string(),
            index,
        })?;
        coordinates.push(pair);
    }

    let feature = LineFeature::new(coordinates);
    validate_line_feature(route_id, &feature)?;
    Ok(Some(feature))
}

fn route_id(route: &Map<String, Value>, index: usize) -> String {
    route
        .get("id")
        .and_then(text)
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("route-{}", index + 1))
}

fn default_priority(index: usize) -> u8 {
    u8::try_from(index + 1)
        .unwrap_or(MAX_ROUTE_PRIORITY)
        .min(MAX_ROUTE_PRIORITY)
}

pub(crate) fn clamp_priority(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(1.0, f64::from(MAX_ROUTE_PRIORITY)) as u8
    } else {
        1
    }
}

fn route_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Count and parse the incident list found under one of `keys`.
///
/// A bare number is taken as a count without locations.
fn read_events(
    containers: &[&Map<String, Value>],
    keys: &[&str],
    default_code: u8,
) -> Result<(usize, Vec<MapIncident>)> {
    let Some((key, value)) = containers.iter().find_map(|c| find_by_keys(c, keys)) else {
        return Ok((0, Vec::new()));
    };

    match value {
        Value::Null => Ok((0, Vec::new())),
        Value::Array(items) => {
            let parsed = items
                .iter()
                .filter_map(|item| parse_incident(item, default_code))
                .collect();
            Ok((items.len(), parsed))
        }
        Value::Number(_) => {
            let count = number(value, key)?.map(route_count).unwrap_or(0);
            Ok((count as usize, Vec::new()))
        }
        Value::String(_) => Ok((1, parse_incident(value, default_code).into_iter().collect())),
        other => bail!("{}: expected a list of incidents, found {}", key, other),
    }
}

/// Parse one incident entry; unparseable or out-of-range entries are `None`.
pub fn parse_incident(value: &Value, default_code: u8) -> Option<MapIncident> {
    let incident = match value {
        Value::String(raw) => parse_incident_text(raw, default_code),
        Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("Feature") => {
            parse_incident_feature(obj, default_code)
        }
        Value::Object(obj) => parse_incident_object(obj, default_code),
        other => {
            log::warn!("Skipping incident of unexpected form: {}", other);
            None
        }
    }?;

    match validate_incident(&incident) {
        Ok(()) => Some(incident),
        Err(e) => {
            log::warn!("Skipping incident: {}", e);
            None
        }
    }
}

/// Parse `"<type> at <lat>, <lon>"`.
///
/// The text is split at the last `" at "`, so descriptions may themselves
/// contain the word.
///
/// # Examples
///
/// ```
/// use snowops::core::incident_code;
/// use snowops::transformations::traffic::parse_incident_text;
///
/// let incident = parse_incident_text("Road works at Rue Saint-Jean at 46.81, -71.21", incident_code::UNKNOWN).unwrap();
/// assert_eq!(incident.kind, incident_code::ROAD_WORKS);
/// assert_eq!(incident.description, "Road works at Rue Saint-Jean");
/// assert_eq!((incident.latitude, incident.longitude), (46.81, -71.21));
///
/// assert!(parse_incident_text("Accident near the bridge", incident_code::UNKNOWN).is_none());
/// ```
pub fn parse_incident_text(raw: &str, default_code: u8) -> Option<MapIncident> {
    let parsed = raw.trim().rsplit_once(" at ").and_then(|(kind, coords)| {
        let (lat, lon) = coords.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lon.trim().parse::<f64>().ok()?;
        Some((kind.trim(), latitude, longitude))
    });

    match parsed {
        Some((kind, latitude, longitude)) => {
            let code = classify(kind, default_code);
            Some(MapIncident {
                kind: code,
                description: describe(kind, code),
                longitude,
                latitude,
            })
        }
        None => {
            log::warn!("Skipping unparseable incident {:?}", raw);
            None
        }
    }
}

fn parse_incident_object(obj: &Map<String, Value>, default_code: u8) -> Option<MapIncident> {
    let latitude = number_by_keys(obj, LATITUDE_KEYS).ok().flatten();
    let longitude = number_by_keys(obj, LONGITUDE_KEYS).ok().flatten();
    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        log::warn!("Skipping incident without coordinates: {}", Value::Object(obj.clone()));
        return None;
    };

    let description = find_by_keys(obj, DESCRIPTION_KEYS)
        .and_then(|(_, v)| text(v))
        .unwrap_or_default();
    let code = category_code(
        find_by_keys(obj, CATEGORY_KEYS).map(|(_, v)| v),
        &description,
        default_code,
    );

    Some(MapIncident {
        kind: code,
        description: describe(&description, code),
        longitude,
        latitude,
    })
}

fn parse_incident_feature(obj: &Map<String, Value>, default_code: u8) -> Option<MapIncident> {
    let coordinates = obj.get("geometry")?.get("coordinates")?.as_array()?;
    // Point geometry, or the first vertex of a line
    let point = match coordinates.first() {
        Some(Value::Array(first)) => first.as_slice(),
        _ => coordinates.as_slice(),
    };
    let (longitude, latitude) = match point {
        [lon, lat, ..] => (lon.as_f64()?, lat.as_f64()?),
        _ => return None,
    };

    let empty = Map::new();
    let properties = obj
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let description = find_by_keys(properties, DESCRIPTION_KEYS)
        .and_then(|(_, v)| text(v))
        .unwrap_or_default();
    let code = category_code(
        find_by_keys(properties, &["iconCategory", "type", "category"]).map(|(_, v)| v),
        &description,
        default_code,
    );

    Some(MapIncident {
        kind: code,
        description: describe(&description, code),
        longitude,
        latitude,
    })
}

fn category_code(category: Option<&Value>, description: &str, default_code: u8) -> u8 {
    match category {
        Some(Value::Number(n)) => n
            .as_u64()
            .filter(|code| *code <= 9)
            .map_or(incident_code::UNKNOWN, |code| code as u8),
        Some(Value::String(s)) => classify(s, default_code),
        _ => classify(description, default_code),
    }
}

/// Map incident type text onto an incident code.
pub fn classify(kind: &str, default_code: u8) -> u8 {
    let kind = kind.to_lowercase();
    if kind.contains("accident") || kind.contains("collision") || kind.contains("crash") {
        incident_code::ACCIDENT
    } else if kind.contains("clos") {
        incident_code::ROAD_CLOSED
    } else if kind.contains("work") || kind.contains("construction") {
        incident_code::ROAD_WORKS
    } else if kind.contains("jam") || kind.contains("congestion") {
        incident_code::JAM
    } else {
        default_code
    }
}

fn describe(text: &str, code: u8) -> String {
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    match code {
        incident_code::ACCIDENT => "Accident",
        incident_code::ROAD_CLOSED => "Road closed",
        incident_code::ROAD_WORKS => "Road works",
        incident_code::JAM => "Traffic jam",
        _ => "Incident",
    }
    .to_string()
}

fn object_at<'a>(payload: &'a Payload, path: &[&str]) -> Result<&'a Map<String, Value>> {
    lookup(payload, path)
        .and_then(Value::as_object)
        .with_context(|| format!("{} must be an object", path.join(".")))
}
