//! Cleaned row type handed to renderers.

use chrono::NaiveDateTime;

/// Pollutant columns coerced to numeric when present.
pub const POLLUTANT_COLUMNS: [&str; 6] = ["pm25", "pm10", "o3", "no2", "so2", "co"];

pub const DATE_COLUMN: &str = "date";
/// Primary metric: rows without it are dropped.
pub const PRIMARY_COLUMN: &str = "pm25";
pub const MONTH_COLUMN: &str = "month";
pub const WEEKDAY_COLUMN: &str = "weekday";

/// One cleaned observation.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRecord {
    pub date: NaiveDateTime,
    pub pm25: f64,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub month: String,
    pub weekday: String,
}
