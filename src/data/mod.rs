//! Data module - CSV loading and cleaning

mod calendar;
mod cleaner;
mod loader;
mod record;

pub use calendar::{month_name, weekday_name, MONTH_NAMES, WEEKDAY_NAMES};
pub use cleaner::{parse_date, parse_or_missing, CleanerError, DataCleaner, DateParseError};
pub use loader::{DataLoader, LoaderError, MISSING_TOKENS};
pub use record::{AirQualityRecord, POLLUTANT_COLUMNS};
