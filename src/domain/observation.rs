use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the upstream weather feed
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of observations a full-day request carries (05:00 through 20:00, every 3h)
pub const OBSERVATIONS_PER_REQUEST: usize = 6;

/// A single weather reading from the upstream feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Air temperature (Celsius)
    pub temperature_c: f64,
    /// Relative humidity (0-100%)
    pub humidity_percent: f64,
    /// Wind speed (m/s)
    pub wind_speed_ms: f64,
    /// Precipitation (mm)
    pub precipitation_mm: f64,
    /// Free-text wind direction, `None` when the feed sent something that is not text
    pub wind_direction: Option<String>,
    /// Atmospheric pressure (hPa)
    pub pressure_hpa: f64,
    /// Naive site-local time, minute resolution
    pub timestamp: NaiveDateTime,
}

/// Drop seconds and sub-second precision
pub fn floor_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}
