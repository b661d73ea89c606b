//! Data Cleaner Module
//! Date parsing, pollutant coercion, primary-metric row filter and
//! calendar feature derivation.

use super::calendar::{month_name, weekday_name};
use super::loader::MISSING_TOKENS;
use super::record::{
    AirQualityRecord, DATE_COLUMN, MONTH_COLUMN, POLLUTANT_COLUMNS, PRIMARY_COLUMN,
    WEEKDAY_COLUMN,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use thiserror::Error;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(&'static str),
    #[error("Row {row}: cannot parse date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Column '{column}' has type {dtype}, expected text or a date")]
    UnsupportedDateType { column: &'static str, dtype: DataType },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date '{0}'")]
pub struct DateParseError(pub String);

/// Coerce one cell to a number; anything unparseable or non-finite
/// (NaN, `inf`, overflow such as `1e400`) is missing.
pub fn parse_or_missing(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parse one date cell. Blank cells and missing-value tokens are `Ok(None)`;
/// any other text that matches no known layout is an error.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDateTime>, DateParseError> {
    let s = raw.trim();
    if s.is_empty() || s == "NaT" || MISSING_TOKENS.contains(&s) {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.naive_local()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Some(dt));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(Some(date.and_time(NaiveTime::MIN)));
        }
    }

    Err(DateParseError(s.to_string()))
}

fn millis_to_datetime(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Handles the cleaning pass over a loaded table.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a loaded table.
    ///
    /// Output columns: the input columns with `date` as a millisecond
    /// datetime, known pollutants as Float64, plus `month` and `weekday`.
    /// Rows missing `date` or `pm25` are dropped; other pollutants keep
    /// their rows with the bad cell nulled.
    pub fn clean(mut df: DataFrame) -> Result<DataFrame, CleanerError> {
        Self::require_column(&df, DATE_COLUMN)?;
        Self::require_column(&df, PRIMARY_COLUMN)?;
        let before = df.height();

        let dates = Self::date_values(df.column(DATE_COLUMN)?)?;
        df.with_column(Self::datetime_series(&dates))?;

        for name in POLLUTANT_COLUMNS {
            if df.get_column_index(name).is_none() {
                continue;
            }
            let values = Self::numeric_values(df.column(name)?)?;
            df.with_column(Column::new(name.into(), values))?;
        }

        let keep: Vec<bool> = dates
            .iter()
            .zip(df.column(PRIMARY_COLUMN)?.f64()?.into_iter())
            .map(|(date, pm25)| date.is_some() && pm25.is_some())
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let mut cleaned = df.filter(&mask)?;

        let kept_dates = Self::date_values(cleaned.column(DATE_COLUMN)?)?;
        let months: Vec<Option<&str>> = kept_dates
            .iter()
            .map(|d| d.as_ref().map(month_name))
            .collect();
        let weekdays: Vec<Option<&str>> = kept_dates
            .iter()
            .map(|d| d.as_ref().map(weekday_name))
            .collect();
        cleaned.with_column(Column::new(MONTH_COLUMN.into(), months))?;
        cleaned.with_column(Column::new(WEEKDAY_COLUMN.into(), weekdays))?;

        log::info!(
            "Data cleaning complete: {} records kept, {} dropped",
            cleaned.height(),
            before - cleaned.height()
        );
        Ok(cleaned)
    }

    /// Convert a cleaned table into plain records.
    ///
    /// Rows without `date` or `pm25` are skipped, so this is total on any
    /// table carrying both columns.
    pub fn to_records(df: &DataFrame) -> Result<Vec<AirQualityRecord>, CleanerError> {
        Self::require_column(df, DATE_COLUMN)?;
        Self::require_column(df, PRIMARY_COLUMN)?;

        let dates = Self::date_values(df.column(DATE_COLUMN)?)?;
        let pm25 = Self::numeric_values(df.column(PRIMARY_COLUMN)?)?;
        let pm10 = Self::optional_values(df, "pm10")?;
        let o3 = Self::optional_values(df, "o3")?;
        let no2 = Self::optional_values(df, "no2")?;
        let so2 = Self::optional_values(df, "so2")?;
        let co = Self::optional_values(df, "co")?;

        let records = (0..df.height())
            .filter_map(|i| {
                let date = dates[i]?;
                let value = pm25[i]?;
                Some(AirQualityRecord {
                    date,
                    pm25: value,
                    pm10: pm10[i],
                    o3: o3[i],
                    no2: no2[i],
                    so2: so2[i],
                    co: co[i],
                    month: month_name(&date).to_string(),
                    weekday: weekday_name(&date).to_string(),
                })
            })
            .collect();

        Ok(records)
    }

    fn require_column(df: &DataFrame, name: &'static str) -> Result<(), CleanerError> {
        if df.get_column_index(name).is_some() {
            Ok(())
        } else {
            Err(CleanerError::MissingColumn(name))
        }
    }

    /// Read a date column that is either raw text or already typed.
    fn date_values(column: &Column) -> Result<Vec<Option<NaiveDateTime>>, CleanerError> {
        match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| match value {
                    None => Ok(None),
                    Some(raw) => parse_date(raw).map_err(|_| CleanerError::InvalidDate {
                        row,
                        value: raw.to_string(),
                    }),
                })
                .collect(),
            DataType::Date | DataType::Datetime(_, _) => {
                let millis = column
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                    .cast(&DataType::Int64)?;
                Ok(millis
                    .i64()?
                    .into_iter()
                    .map(|v| v.and_then(millis_to_datetime))
                    .collect())
            }
            DataType::Null => Ok(vec![None; column.len()]),
            other => Err(CleanerError::UnsupportedDateType {
                column: DATE_COLUMN,
                dtype: other.clone(),
            }),
        }
    }

    fn datetime_series(dates: &[Option<NaiveDateTime>]) -> Series {
        Int64Chunked::from_iter_options(
            DATE_COLUMN.into(),
            dates
                .iter()
                .map(|d| d.map(|dt| dt.and_utc().timestamp_millis())),
        )
        .into_datetime(TimeUnit::Milliseconds, None)
        .into_series()
    }

    /// Read a pollutant column, coercing text cell by cell.
    fn numeric_values(column: &Column) -> Result<Vec<Option<f64>>, CleanerError> {
        let values = match column.dtype() {
            DataType::String => column
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_or_missing))
                .collect(),
            _ => column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect(),
        };
        Ok(values)
    }

    fn optional_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, CleanerError> {
        match df.get_column_index(name) {
            Some(_) => Self::numeric_values(df.column(name)?),
            None => Ok(vec![None; df.height()]),
        }
    }
}
