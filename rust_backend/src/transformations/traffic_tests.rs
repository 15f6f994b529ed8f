#[cfg(test)]
mod tests {
    use crate::config::{TrafficSettings, TransformDefaults};
    use crate::core::{incident_code, StatusColor, VehiclePriority, ZoneStatus};
    use crate::error::GeometryError;
    use crate::parsing::{normalize_payload, DecodeMode, Payload};
    use crate::transformations::traffic::{
        classify, parse_incident, parse_incident_text, transform_traffic, TrafficOutcome,
        TrafficShape, TRAFFIC_SHAPES,
    };
    use serde_json::{json, Value};

    fn payload(value: &Value) -> Payload {
        normalize_payload(Some(&value.to_string()), DecodeMode::Nested)
    }

    fn transform(value: Value) -> Result<TrafficOutcome, GeometryError> {
        transform_traffic(
            &payload(&value),
            &TransformDefaults::default(),
            &TrafficSettings::default(),
        )
    }

    fn route_feature(coordinates: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": coordinates}
        })
    }

    /// Shape rules are evaluated in declaration order
    #[test]
    fn test_shape_detection_order() {
        let both = payload(&json!({
            "currentTrafficFlow": {"speed": 40},
            "routeOptimizationPlan": {"trafficImpactAnalysis": {"speed": 20}}
        }));
        assert_eq!(TRAFFIC_SHAPES.detect(&both), Some(TrafficShape::RoutePlan));

        let flow = payload(&json!({"currentTrafficFlow": {"speed": 40}, "active_routes": 3}));
        assert_eq!(TRAFFIC_SHAPES.detect(&flow), Some(TrafficShape::TrafficFlow));

        let summary = payload(&json!({"active_routes": 3}));
        assert_eq!(TRAFFIC_SHAPES.detect(&summary), Some(TrafficShape::Summary));

        assert_eq!(TRAFFIC_SHAPES.detect(&Payload::new()), None);
    }

    /// Speed, incidents and closures drive coverage, routes and fleet
    #[test]
    fn test_traffic_flow() {
        let outcome = transform(json!({
            "currentTrafficFlow": {
                "speed": 30,
                "incidents": [
                    "Accident at 46.8139, -71.2080",
                    "Stalled vehicle at nowhere"
                ],
                "roadClosures": ["Closure at 46.80, -71.25"]
            }
        }))
        .unwrap();

        let routes = &outcome.routes;
        assert_eq!(routes.coverage, 60.0);
        assert_eq!(routes.active_routes, 3);
        assert_eq!(
            routes.efficiency_scores.iter().collect::<Vec<_>>(),
            vec![("Route 1", &85.0), ("Route 2", &80.0), ("Route 3", &75.0)]
        );
        assert_eq!(routes.priority_zones.len(), 3);

        let priorities: Vec<_> = outcome.fleet.vehicles.iter().map(|v| v.priority).collect();
        assert_eq!(
            priorities,
            vec![VehiclePriority::High, VehiclePriority::High, VehiclePriority::Medium]
        );
        assert_eq!(outcome.fleet.vehicles[2].id, "Truck 3");
        assert_eq!(outcome.fleet.vehicles[2].region, "Zone 3");

        // The unparseable incident still counts but is left off the map
        let map = outcome.map.unwrap();
        assert!(map.routes.is_empty());
        assert_eq!(map.incidents.len(), 2);
        assert_eq!(map.incidents[0].kind, incident_code::ACCIDENT);
        assert_eq!(map.incidents[0].latitude, 46.8139);
        assert_eq!(map.incidents[0].longitude, -71.2080);
        assert_eq!(map.incidents[1].kind, incident_code::ROAD_CLOSED);
    }

    /// Coverage is capped at the reference speed
    #[test]
    fn test_fast_traffic_coverage_capped() {
        let outcome = transform(json!({"currentTrafficFlow": {"currentSpeed": 85.0}})).unwrap();
        assert_eq!(outcome.routes.coverage, 100.0);
        assert_eq!(outcome.routes.active_routes, 1);
        assert_eq!(outcome.fleet.vehicles[0].priority, VehiclePriority::Medium);
        assert!(outcome.map.is_none());
    }

    #[test]
    fn test_missing_speed_uses_default_coverage() {
        let outcome = transform(json!({"currentTrafficFlow": {"incidents": []}})).unwrap();
        assert_eq!(outcome.routes.coverage, 75.0);
    }

    /// The nested plan reads its flow from trafficImpactAnalysis
    #[test]
    fn test_route_plan_with_routes() {
        let outcome = transform(json!({
            "routeOptimizationPlan": {
                "trafficImpactAnalysis": {
                    "currentTrafficFlow": {"averageSpeed": 45},
                    "incidents": ["Traffic jam at 46.79, -71.30"]
                },
                "routes": [
                    {"id": "north-loop", "priority": 7, "geometry": route_feature(json!([[-71.21, 46.81], [-71.22, 46.83]]))},
                    {"geometry": route_feature(json!([[-71.3, 46.7]]))},
                    {"id": "depot-shuttle"}
                ]
            }
        }))
        .unwrap();

        assert_eq!(outcome.routes.coverage, 90.0);
        assert_eq!(outcome.routes.active_routes, 1);

        let map = outcome.map.unwrap();
        assert_eq!(map.routes.len(), 2);
        assert_eq!(map.routes[0].id, "north-loop");
        assert_eq!(map.routes[0].priority, 3);
        assert_eq!(map.routes[1].id, "route-2");
        assert_eq!(map.routes[1].priority, 2);
        assert_eq!(map.incidents[0].kind, incident_code::JAM);
    }

    /// A priority that is not a number falls back to the positional default
    #[test]
    fn test_route_plan_keeps_routes_with_bad_priority() {
        let outcome = transform(json!({
            "routeOptimizationPlan": {
                "trafficImpactAnalysis": {
                    "speed": 40,
                    "incidents": ["Accident at 46.8, -71.2"]
                },
                "routes": [
                    {"id": "r1", "priority": "high", "geometry": route_feature(json!([[-71.21, 46.81]]))},
                    {"id": "r2", "priority": {"rank": 1}, "geometry": route_feature(json!([[-71.22, 46.82]]))}
                ]
            }
        }))
        .unwrap();

        assert_eq!(outcome.routes.coverage, 80.0);
        let map = outcome.map.unwrap();
        assert_eq!(map.routes.len(), 2);
        assert_eq!(map.routes[0].priority, 1);
        assert_eq!(map.routes[1].priority, 2);
        assert_eq!(map.incidents.len(), 1);
    }

    /// The plan may arrive as a JSON-encoded string
    #[test]
    fn test_route_plan_encoded_as_string() {
        let plan = json!({"trafficImpactAnalysis": {"speed": 10}}).to_string();
        let outcome = transform(json!({ "routeOptimizationPlan": plan })).unwrap();
        assert_eq!(outcome.routes.coverage, 20.0);
    }

    /// Out-of-range route coordinates are fatal
    #[test]
    fn test_invalid_geometry_is_fatal() {
        let result = transform(json!({
            "routeOptimizationPlan": {
                "trafficImpactAnalysis": {"speed": 40},
                "routes": [{"id": "r1", "geometry": route_feature(json!([[200, 46.8]]))}]
            }
        }));

        match result {
            Err(GeometryError::OutOfRange { route, longitude, .. }) => {
                assert_eq!(route, "r1");
                assert_eq!(longitude, 200.0);
            }
            other => panic!("Expected out-of-range error, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_linestring_is_fatal() {
        let result = transform(json!({
            "currentTrafficFlow": {"speed": 40},
            "routes": [{"geometry": {"type": "LineString", "coordinates": [[-71.2, 46.8]]}}]
        }));
        assert!(matches!(result, Err(GeometryError::NotAFeature { .. })));
    }

    /// The routing report builds geometry from leg points
    #[test]
    fn test_optimized_route_report() {
        let outcome = transform(json!({
            "optimized_route": {
                "routes": [
                    {
                        "summary": {"lengthInMeters": 12500},
                        "legs": [{"points": [
                            {"latitude": 46.81, "longitude": -71.21},
                            {"latitude": 46.82, "longitude": -71.23}
                        ]}]
                    },
                    {"summary": {"lengthInMeters": 8000}}
                ]
            },
            "traffic_incidents": {
                "incidents": [{
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-71.22, 46.815]},
                    "properties": {"iconCategory": 1, "description": "Collision on Route 175"}
                }]
            }
        }))
        .unwrap();

        assert_eq!(outcome.routes.active_routes, 2);
        assert_eq!(outcome.routes.coverage, 80.0);
        assert!(outcome
            .fleet
            .vehicles
            .iter()
            .all(|v| v.priority == VehiclePriority::High));

        let map = outcome.map.unwrap();
        assert_eq!(map.routes.len(), 1);
        assert_eq!(map.routes[0].id, "route-1");
        assert_eq!(
            map.routes[0].geometry.geometry.coordinates,
            vec![[-71.21, 46.81], [-71.23, 46.82]]
        );
        assert_eq!(map.incidents[0].kind, incident_code::ACCIDENT);
        assert_eq!(map.incidents[0].description, "Collision on Route 175");
    }

    #[test]
    fn test_optimized_route_without_length() {
        let outcome = transform(json!({"optimized_route": {"routes": [{"legs": []}]}})).unwrap();
        assert_eq!(outcome.routes.coverage, 75.0);
        assert_eq!(outcome.routes.active_routes, 1);
        assert!(outcome.map.is_none());
    }

    /// Summary values and upstream scores and zones are used as given
    #[test]
    fn test_summary_with_upstream_scores() {
        let outcome = transform(json!({
            "active_routes": 2,
            "coverage": 75.0,
            "efficiency_scores": {"Downtown": 91.5, "Airport": "77"},
            "priority_zones": {"Hospitals": [95, "HIGH"], "Parks": [20, "purple"]}
        }))
        .unwrap();

        assert_eq!(outcome.routes.active_routes, 2);
        assert_eq!(outcome.routes.efficiency_scores.get("Airport"), Some(&77.0));
        assert_eq!(
            outcome.routes.priority_zones.get("Hospitals"),
            Some(&ZoneStatus(95.0, StatusColor::Danger))
        );
        assert_eq!(
            outcome.routes.priority_zones.get("Parks"),
            Some(&ZoneStatus(20.0, StatusColor::Info))
        );
        assert_eq!(outcome.fleet.vehicles.len(), 2);
        assert!(outcome.map.is_none());
    }

    /// Synthetic scores keep falling past zero; assembly clamps them later
    #[test]
    fn test_synthetic_scores_unclamped() {
        let outcome = transform(json!({"active_routes": 20})).unwrap();
        assert_eq!(outcome.routes.efficiency_scores.get("Route 20"), Some(&-10.0));
    }

    /// Roster size follows the upstream count; scores keep route order
    #[test]
    fn test_large_roster_from_summary() {
        let outcome = transform(json!({"active_routes": 100_000})).unwrap();
        let scores = &outcome.routes.efficiency_scores;

        assert_eq!(outcome.routes.active_routes, 100_000);
        assert_eq!(scores.len(), 100_000);
        assert_eq!(outcome.fleet.vehicles.len(), 100_000);
        assert_eq!(scores.keys().next(), Some("Route 1"));
        assert_eq!(scores.keys().last(), Some("Route 100000"));
        assert_eq!(scores.get("Route 3"), Some(&75.0));
    }

    #[test]
    fn test_empty_payload_defaults() {
        let outcome = transform_traffic(
            &Payload::new(),
            &TransformDefaults::default(),
            &TrafficSettings::default(),
        )
        .unwrap();
        assert_eq!(outcome.routes.active_routes, 1);
        assert_eq!(outcome.routes.coverage, 75.0);
        assert_eq!(outcome.fleet.vehicles.len(), 1);
        assert!(outcome.map.is_none());
    }

    /// Non-geometry faults fall back to the fixed default with an empty map
    #[test]
    fn test_type_mismatch_failure_mode() {
        let outcome = transform(json!({"currentTrafficFlow": {"speed": "fast"}})).unwrap();
        assert_eq!(outcome.routes.active_routes, 1);
        assert_eq!(outcome.routes.coverage, 75.0);
        assert_eq!(
            outcome.routes.efficiency_scores.iter().collect::<Vec<_>>(),
            vec![("Route 1", &85.0)]
        );
        assert_eq!(outcome.fleet.vehicles[0].id, "Truck 1");
        assert_eq!(outcome.fleet.vehicles[0].priority, VehiclePriority::High);
        let map = outcome.map.unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_parse_incident_text() {
        let incident = parse_incident_text("Accident at 46.8139, -71.2080", 0).unwrap();
        assert_eq!(incident.description, "Accident");
        assert_eq!(incident.latitude, 46.8139);
        assert_eq!(incident.longitude, -71.2080);

        assert!(parse_incident_text("Accident at 46.8", 0).is_none());
        assert!(parse_incident_text("Accident at north, south", 0).is_none());
        assert!(parse_incident_text("", 0).is_none());
    }

    #[test]
    fn test_out_of_range_incident_skipped() {
        assert!(parse_incident(&json!("Accident at 95.0, -71.2"), 0).is_none());
        assert!(parse_incident(&json!({"latitude": 46.8, "longitude": -200.0}), 0).is_none());
    }

    #[test]
    fn test_incident_objects() {
        let incident = parse_incident(
            &json!({"type": "road works", "lat": "46.8", "lon": -71.2}),
            incident_code::UNKNOWN,
        )
        .unwrap();
        assert_eq!(incident.kind, incident_code::ROAD_WORKS);
        assert_eq!(incident.description, "Road works");

        let incident = parse_incident(&json!({"type": 9, "latitude": 46.8, "longitude": -71.2}), 0).unwrap();
        assert_eq!(incident.kind, incident_code::JAM);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("Multi-vehicle Collision", 0), incident_code::ACCIDENT);
        assert_eq!(classify("Lane closed", 0), incident_code::ROAD_CLOSED);
        assert_eq!(classify("Construction zone", 0), incident_code::ROAD_WORKS);
        assert_eq!(classify("Congestion", 0), incident_code::JAM);
        assert_eq!(classify("Fallen tree", incident_code::ROAD_CLOSED), incident_code::ROAD_CLOSED);
        assert_eq!(classify("Fallen tree", 0), incident_code::UNKNOWN);
    }
}
