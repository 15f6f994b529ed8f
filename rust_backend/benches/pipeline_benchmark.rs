use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use snowops::io::emit_document;
use snowops::parsing::{normalize_payload, DecodeMode};
use snowops::{OperationalPipeline, RawInputs};

const WEATHER: &str = r#"{
    "current_temp": -6.5,
    "current_conditions": "Moderate snow",
    "accumulation": 12.0,
    "forecast": [
        {"time": "now", "snowfall": 1.5, "temp": -6.5},
        {"time": "later", "snowfall": 2.0, "temp": -8.0},
        {"time": "2026-01-10T18:00:00Z", "snowfall": 0.5, "temp": -9.0}
    ],
    "alerts": [{"level": "warning", "message": "Winter storm watch"}]
}"#;

const FUEL: &str = r#"{"fuel_level": 60.0}"#;
const SALT: &str = r#"{"salt_level": 75.0}"#;

fn traffic_payload(routes: usize) -> String {
    let entries: Vec<String> = (0..routes)
        .map(|i| {
            let lon = -71.2 + i as f64 * 0.01;
            format!(
                r#"{{"id": "R{i}", "priority": {p}, "geometry": {{"type": "Feature", "properties": {{}}, "geometry": {{"type": "LineString", "coordinates": [[{lon}, 46.8], [{lon2}, 46.81]]}}}}}}"#,
                i = i,
                p = i % 3 + 1,
                lon = lon,
                lon2 = lon + 0.005
            )
        })
        .collect();
    format!(
        r#"{{"routeOptimizationPlan": {{"trafficImpactAnalysis": {{"averageSpeed": 35, "incidents": ["Accident at 46.81, -71.21"]}}, "routes": [{}]}}}}"#,
        entries.join(",")
    )
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let nested = format!(r#"{{"weather": {:?}, "fuel": {:?}}}"#, WEATHER, FUEL);
    group.bench_function("nested_payload", |b| {
        b.iter(|| normalize_payload(black_box(Some(nested.as_str())), DecodeMode::Nested));
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = OperationalPipeline::new();
    let now = Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap();

    for routes in [1usize, 10, 100] {
        let inputs = RawInputs::new(Some(WEATHER), Some(FUEL), Some(SALT), Some(&traffic_payload(routes)));
        group.bench_with_input(BenchmarkId::new("run_and_emit", routes), &inputs, |b, inputs| {
            b.iter(|| {
                let outcome = pipeline.run_at(black_box(inputs), now).unwrap();
                black_box(emit_document(&outcome.snapshot).unwrap())
            });
        });
    }

    group.bench_function("empty_inputs", |b| {
        b.iter(|| pipeline.run_at(black_box(&RawInputs::default()), now).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_pipeline);
criterion_main!(benches);
