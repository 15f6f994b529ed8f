//! Weather payload transformation.
//!
//! Maps a normalized weather payload onto [`WeatherSnapshot`]. Three upstream
//! shapes are recognized (see [`WeatherShape`]); anything else yields the
//! documented defaults. Transformation never fails: internal errors are
//! converted into the "Error" snapshot carrying one warning alert.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::ForecastSettings;
use crate::core::{Alert, AlertLevel, ChartSeries, ForecastEntry, WeatherSnapshot};
use crate::parsing::lenient::{
    deserialize_lenient_f64, deserialize_lenient_text, find_by_keys, number_by_keys, text,
};
use crate::parsing::{lookup, Payload, Matcher, ShapeTable};
use crate::time::{chart_label, normalize_forecast_time};

/// Known weather payload layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherShape {
    /// Raw weather collaborator report (`current_conditions.temperature`).
    ToolReport,
    /// `current_weather_conditions` object with snowfall predictions.
    Nested,
    /// Flat `current_temp` / `forecast` / `alerts` layout.
    Flat,
}

pub const WEATHER_SHAPES: ShapeTable<WeatherShape> = ShapeTable::new(&[
    (
        Matcher::Path(&["current_conditions", "temperature"]),
        WeatherShape::ToolReport,
    ),
    (
        Matcher::ObjectAt(&["current_weather_conditions"]),
        WeatherShape::Nested,
    ),
    (
        Matcher::AnyKey(&[
            "current_temp",
            "current_conditions",
            "accumulation",
            "forecast",
            "alerts",
        ]),
        WeatherShape::Flat,
    ),
]);

const NO_DATA: &str = "No data";

/// Candidate keys inside a snowfall prediction entry
const PREDICTION_TIME_KEYS: &[&str] = &["time", "timestamp", "date", "period"];
const PREDICTION_SNOWFALL_KEYS: &[&str] = &["snowfall", "predicted_snowfall", "snow_amount", "amount"];
const PREDICTION_TEMP_KEYS: &[&str] = &["temp", "temperature", "predicted_temperature"];

/// Candidate keys for a conditions description in the nested shape
const CONDITION_KEYS: &[&str] = &["conditions", "description", "road_condition"];

/// Weather values before time normalization and clamping.
#[derive(Debug, Default)]
struct RawWeather {
    current_temp: f64,
    conditions: Option<String>,
    accumulation: f64,
    forecast: Vec<RawForecast>,
    alerts: Vec<Alert>,
}

#[derive(Debug)]
struct RawForecast {
    time: String,
    snowfall: f64,
    temp: f64,
}

#[derive(Debug, Default, Deserialize)]
struct FlatWeather {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    current_temp: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_text")]
    current_conditions: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    accumulation: Option<f64>,
    #[serde(default)]
    forecast: Option<Vec<FlatForecastEntry>>,
    #[serde(default)]
    alerts: Option<Vec<FlatAlert>>,
}

#[derive(Debug, Deserialize)]
struct FlatForecastEntry {
    #[serde(default, alias = "timestamp", deserialize_with = "deserialize_lenient_text")]
    time: Option<String>,
    #[serde(default, alias = "snow", deserialize_with = "deserialize_lenient_f64")]
    snowfall: Option<f64>,
    #[serde(default, alias = "temperature", deserialize_with = "deserialize_lenient_f64")]
    temp: Option<f64>,
}

/// Alert levels and messages of any JSON type are accepted; an unusable level
/// becomes a warning and an unusable message drops the alert.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlatAlert {
    Text(String),
    Entry {
        #[serde(default)]
        level: Option<Value>,
        #[serde(default, alias = "text", alias = "description")]
        message: Option<Value>,
    },
    Other(Value),
}

impl FlatAlert {
    fn into_alert(self) -> Alert {
        match self {
            FlatAlert::Text(message) => Alert::warning(message),
            FlatAlert::Entry { level, message } => Alert::new(
                AlertLevel::normalize(&level.as_ref().and_then(text).unwrap_or_default()),
                message.as_ref().and_then(text).unwrap_or_default(),
            ),
            FlatAlert::Other(value) => {
                log::debug!("Ignoring weather alert {}", value);
                Alert::warning("")
            }
        }
    }
}

/// Transform a normalized weather payload.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use snowops::config::ForecastSettings;
/// use snowops::parsing::{normalize_payload, DecodeMode};
/// use snowops::transformations::transform_weather;
///
/// let payload = normalize_payload(
///     Some(r#"{"current_temp": "warm", "current_conditions": "Clear"}"#),
///     DecodeMode::Nested,
/// );
/// let weather = transform_weather(&payload, &ForecastSettings::default(), Utc::now());
/// assert_eq!(weather.current_conditions, "Error");
/// assert_eq!(weather.alerts.len(), 1);
/// ```
pub fn transform_weather(
    payload: &Payload,
    settings: &ForecastSettings,
    now: DateTime<Utc>,
) -> WeatherSnapshot {
    match read_weather(payload) {
        Ok(raw) => finish(raw, settings, now),
        Err(e) => {
            log::warn!("Failed to transform weather data: {:#}", e);
            failed_snapshot(&format!("{:#}", e))
        }
    }
}

fn read_weather(payload: &Payload) -> Result<RawWeather> {
    match WEATHER_SHAPES.detect(payload) {
        Some(WeatherShape::ToolReport) => {
            log::debug!("Weather payload shape: tool report");
            read_tool_report(payload)
        }
        Some(WeatherShape::Nested) => {
            log::debug!("Weather payload shape: nested conditions");
            read_nested(payload)
        }
        Some(WeatherShape::Flat) => {
            log::debug!("Weather payload shape: flat");
            read_flat(payload)
        }
        None => {
            log::debug!("Weather payload not recognized, using defaults");
            Ok(RawWeather::default())
        }
    }
}

fn read_tool_report(payload: &Payload) -> Result<RawWeather> {
    let current = lookup(payload, &["current_conditions"])
        .and_then(Value::as_object)
        .context("current_conditions must be an object")?;

    let mut raw = RawWeather {
        current_temp: number_by_keys(current, &["temperature"])?.unwrap_or(0.0),
        conditions: current.get("road_condition").and_then(text),
        accumulation: number_by_keys(current, &["snow_amount_mm"])?.unwrap_or(0.0) / 10.0,
        ..RawWeather::default()
    };

    for (index, entry) in entries(payload.get("forecast"), "forecast")?.iter().enumerate() {
        let entry = entry_object(entry, "forecast", index)?;
        raw.forecast.push(RawForecast {
            time: entry.get("timestamp").and_then(text).unwrap_or_default(),
            snowfall: number_by_keys(entry, &["snow_amount_mm"])?.unwrap_or(0.0) / 10.0,
            temp: number_by_keys(entry, &["temperature"])?.unwrap_or(0.0),
        });
    }

    if let Some(flags) = payload.get("alerts").and_then(Value::as_object) {
        if flag(flags, "snow_expected") {
            raw.alerts.push(Alert::info("Snow expected in forecast window"));
        }
        if flag(flags, "icy_conditions_risk") {
            raw.alerts.push(Alert::warning("Risk of icy road conditions"));
        }
    }

    Ok(raw)
}

fn read_nested(payload: &Payload) -> Result<RawWeather> {
    let current = lookup(payload, &["current_weather_conditions"])
        .and_then(Value::as_object)
        .context("current_weather_conditions must be an object")?;

    let mut raw = RawWeather {
        current_temp: number_by_keys(current, &["temperature"])?.unwrap_or(0.0),
        accumulation: number_by_keys(current, &["current_snow_amount"])?.unwrap_or(0.0),
        ..RawWeather::default()
    };

    let described = find_by_keys(current, CONDITION_KEYS).and_then(|(_, v)| text(v));
    raw.conditions = match current.get("snow_alert") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Bool(true)) => {
            raw.alerts.push(Alert::warning("Snow alert in effect"));
            described.or_else(|| Some("Snow alert".to_string()))
        }
        Some(Value::Bool(false)) => described.or_else(|| Some("No active snow alert".to_string())),
        _ => described,
    };

    let predictions = current
        .get("snowfall_predictions")
        .or_else(|| payload.get("snowfall_predictions"));
    for (index, entry) in entries(predictions, "snowfall_predictions")?.iter().enumerate() {
        let entry = entry_object(entry, "snowfall_predictions", index)?;
        raw.forecast.push(RawForecast {
            time: find_by_keys(entry, PREDICTION_TIME_KEYS)
                .and_then(|(_, v)| text(v))
                .unwrap_or_default(),
            snowfall: number_by_keys(entry, PREDICTION_SNOWFALL_KEYS)?.unwrap_or(0.0),
            temp: number_by_keys(entry, PREDICTION_TEMP_KEYS)?.unwrap_or(0.0),
        });
    }

    Ok(raw)
}

fn read_flat(payload: &Payload) -> Result<RawWeather> {
    let value = Value::Object(payload.clone());
    let flat: FlatWeather =
        serde_path_to_error::deserialize(&value).context("flat weather payload")?;

    Ok(RawWeather {
        current_temp: flat.current_temp.unwrap_or(0.0),
        conditions: flat.current_conditions,
        accumulation: flat.accumulation.unwrap_or(0.0),
        forecast: flat
            .forecast
            .unwrap_or_default()
            .into_iter()
            .map(|entry| RawForecast {
                time: entry.time.unwrap_or_default(),
                snowfall: entry.snowfall.unwrap_or(0.0),
                temp: entry.temp.unwrap_or(0.0),
            })
            .collect(),
        alerts: flat
            .alerts
            .unwrap_or_default()
            .into_iter()
            .map(FlatAlert::into_alert)
            .collect(),
    })
}

/// Normalize times, clamp amounts and derive the chart series.
fn finish(raw: RawWeather, settings: &ForecastSettings, now: DateTime<Utc>) -> WeatherSnapshot {
    let later_offset = Duration::try_hours(settings.later_offset_hours).unwrap_or_else(|| {
        log::warn!(
            "later_offset_hours {} out of range, ignoring offset",
            settings.later_offset_hours
        );
        Duration::zero()
    });

    let forecast: Vec<ForecastEntry> = raw
        .forecast
        .into_iter()
        .map(|entry| ForecastEntry {
            time: normalize_forecast_time(&entry.time, now, later_offset),
            snowfall: non_negative(entry.snowfall),
            temp: finite_or_zero(entry.temp),
        })
        .collect();

    let alerts = raw
        .alerts
        .into_iter()
        .filter(|alert| {
            let keep = !alert.message.trim().is_empty();
            if !keep {
                log::debug!("Dropping weather alert with empty message");
            }
            keep
        })
        .collect();

    let current_conditions = raw
        .conditions
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| NO_DATA.to_string());

    WeatherSnapshot {
        current_temp: finite_or_zero(raw.current_temp),
        current_conditions,
        accumulation: non_negative(raw.accumulation),
        chart_series: build_chart_series(&forecast),
        forecast,
        alerts,
    }
}

/// Chart-ready series aligned index-for-index with `forecast`.
pub fn build_chart_series(forecast: &[ForecastEntry]) -> ChartSeries {
    ChartSeries {
        labels: forecast.iter().map(|e| chart_label(&e.time)).collect(),
        temperature: forecast.iter().map(|e| e.temp).collect(),
        precipitation: vec![0.0; forecast.len()],
        snowfall: forecast.iter().map(|e| e.snowfall).collect(),
    }
}

fn failed_snapshot(reason: &str) -> WeatherSnapshot {
    WeatherSnapshot {
        current_temp: 0.0,
        current_conditions: "Error".to_string(),
        accumulation: 0.0,
        forecast: Vec::new(),
        alerts: vec![Alert::warning(format!(
            "Failed to transform weather data: {}",
            reason
        ))],
        chart_series: ChartSeries::default(),
    }
}

fn entries<'a>(value: Option<&'a Value>, field: &str) -> Result<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => bail!("{}: expected a list, found {}", field, other),
    }
}

fn entry_object<'a>(value: &'a Value, field: &str, index: usize) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .with_context(|| format!("{}[{}]: expected an object", field, index))
}

fn flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
