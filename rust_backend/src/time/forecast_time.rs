//! Best-effort normalization of forecast timestamps.
//!
//! Forecast entries arrive with ISO timestamps, bare times of day, or words
//! such as "later". Every entry leaves this module with a string that parses
//! as a timestamp. The policy is deliberately lossy: unparseable text is
//! replaced with the current time.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Naive datetime layouts accepted as ISO-8601
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Time-of-day layouts that get today's date prepended
const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M %p", "%I:%M:%S %p", "%I:%M%p"];

/// Token meaning "a few hours from now"
const LATER_TOKEN: &str = "later";

/// Normalize one forecast time value.
///
/// - ISO-8601 input is returned unchanged
/// - `"later"` (any case) becomes `now + later_offset`
/// - a bare time of day is placed on today's date, suffixed as UTC
/// - anything else becomes `now`
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use snowops::time::normalize_forecast_time;
///
/// let now = Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap();
/// let offset = Duration::hours(3);
///
/// assert_eq!(normalize_forecast_time("2025-02-14 00:00:00", now, offset), "2025-02-14 00:00:00");
/// assert_eq!(normalize_forecast_time("Later", now, offset), "2025-02-14T12:30:00Z");
/// assert_eq!(normalize_forecast_time("18:00", now, offset), "2025-02-14T18:00:00Z");
/// assert_eq!(normalize_forecast_time("Next few hours", now, offset), "2025-02-14T09:30:00Z");
/// ```
pub fn normalize_forecast_time(raw: &str, now: DateTime<Utc>, later_offset: Duration) -> String {
    let trimmed = raw.trim();

    if parse_timestamp(trimmed).is_some() {
        return trimmed.to_string();
    }

    if trimmed.eq_ignore_ascii_case(LATER_TOKEN) {
        let later = now.checked_add_signed(later_offset).unwrap_or_else(|| {
            log::warn!("Forecast offset {} out of range, using current time", later_offset);
            now
        });
        return format_utc(later);
    }

    if let Some(time) = parse_time_of_day(trimmed) {
        return format!("{}T{}Z", now.date_naive(), time.format("%H:%M:%S"));
    }

    if !trimmed.is_empty() {
        log::debug!("Unparseable forecast time {:?}, using current time", trimmed);
    }
    format_utc(now)
}

/// Parse an ISO-8601 timestamp into naive UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Short chart label for a normalized forecast time.
pub fn chart_label(normalized: &str) -> String {
    match parse_timestamp(normalized) {
        Some(dt) => dt.format("%m-%d %H:%M").to_string(),
        None => normalized.to_string(),
    }
}

fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim_end_matches(['Z', 'z']).trim();
    if s.is_empty() {
        return None;
    }
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 22, 15, 0).unwrap()
    }

    fn normalize(raw: &str) -> String {
        normalize_forecast_time(raw, now(), Duration::hours(3))
    }

    #[test]
    fn test_iso_inputs_are_kept() {
        assert_eq!(normalize("2026-01-11T03:00:00Z"), "2026-01-11T03:00:00Z");
        assert_eq!(normalize("2026-01-11T03:00:00+00:00"), "2026-01-11T03:00:00+00:00");
        assert_eq!(normalize("2026-01-11T03:00:00.250"), "2026-01-11T03:00:00.250");
        assert_eq!(normalize("2026-01-11"), "2026-01-11");
    }

    #[test]
    fn test_later_crosses_midnight() {
        assert_eq!(normalize("LATER"), "2026-01-11T01:15:00Z");
    }

    #[test]
    fn test_later_overflow_falls_back_to_now() {
        let normalized = normalize_forecast_time("later", now(), Duration::days(100_000_000));
        assert_eq!(normalized, "2026-01-10T22:15:00Z");
    }

    #[test]
    fn test_time_of_day_variants() {
        assert_eq!(normalize("06:45"), "2026-01-10T06:45:00Z");
        assert_eq!(normalize("06:45:30"), "2026-01-10T06:45:30Z");
        assert_eq!(normalize("7:05 PM"), "2026-01-10T19:05:00Z");
        assert_eq!(normalize("23:00Z"), "2026-01-10T23:00:00Z");
    }

    #[test]
    fn test_fallback_to_now() {
        assert_eq!(normalize("Future"), "2026-01-10T22:15:00Z");
        assert_eq!(normalize(""), "2026-01-10T22:15:00Z");
        assert_eq!(normalize("25:99"), "2026-01-10T22:15:00Z");
    }

    #[test]
    fn test_every_output_parses() {
        for raw in ["later", "12:00", "tonight", "2026-01-11 06:00:00", ""] {
            let normalized = normalize(raw);
            assert!(parse_timestamp(&normalized).is_some(), "{:?} -> {:?}", raw, normalized);
        }
    }

    #[test]
    fn test_chart_label() {
        assert_eq!(chart_label("2026-01-11T03:00:00Z"), "01-11 03:00");
        assert_eq!(chart_label("2026-01-11 06:30:00"), "01-11 06:30");
        assert_eq!(chart_label("soon"), "soon");
    }
}
