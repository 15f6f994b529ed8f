pub mod forecast_time;

pub use forecast_time::{chart_label, normalize_forecast_time, parse_timestamp};
