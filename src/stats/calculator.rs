//! Statistics Calculator Module
//! Box-plot summaries of PM2.5 grouped by calendar category.

use crate::data::{AirQualityRecord, MONTH_NAMES, WEEKDAY_NAMES};
use statrs::statistics::Statistics;

/// Whisker reach, in multiples of the interquartile range
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Categorical axis a chart groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAxis {
    Month,
    Weekday,
}

impl CategoryAxis {
    /// Category labels in canonical order.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            CategoryAxis::Month => &MONTH_NAMES,
            CategoryAxis::Weekday => &WEEKDAY_NAMES,
        }
    }

    fn key(self, record: &AirQualityRecord) -> &str {
        match self {
            CategoryAxis::Month => &record.month,
            CategoryAxis::Weekday => &record.weekday,
        }
    }
}

/// Five-number summary plus outliers for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Statistics for one category slot on the axis.
#[derive(Debug, Clone)]
pub struct CategoryStats {
    pub label: &'static str,
    pub values: Vec<f64>,
    /// `None` when the category has no observations.
    pub summary: Option<BoxSummary>,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Group PM2.5 by category, one entry per label in canonical order.
    pub fn group_by_category(
        records: &[AirQualityRecord],
        axis: CategoryAxis,
    ) -> Vec<CategoryStats> {
        axis.labels()
            .iter()
            .map(|&label| {
                let values: Vec<f64> = records
                    .iter()
                    .filter(|r| axis.key(r) == label)
                    .map(|r| r.pm25)
                    .collect();
                let summary = Self::compute_box_summary(&values);
                CategoryStats {
                    label,
                    values,
                    summary,
                }
            })
            .collect()
    }

    /// Compute the box-plot summary of a sample.
    pub fn compute_box_summary(values: &[f64]) -> Option<BoxSummary> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        // Whiskers stop at the most extreme observation inside the fences
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        let std = if n > 1 { values.iter().std_dev() } else { 0.0 };

        Some(BoxSummary {
            count: n,
            mean: values.iter().mean(),
            std,
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{month_name, weekday_name};
    use chrono::{NaiveDate, NaiveDateTime};

    fn record(y: i32, m: u32, d: u32, pm25: f64) -> AirQualityRecord {
        let date: NaiveDateTime = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        AirQualityRecord {
            date,
            pm25,
            pm10: None,
            o3: None,
            no2: None,
            so2: None,
            co: None,
            month: month_name(&date).to_string(),
            weekday: weekday_name(&date).to_string(),
        }
    }

    #[test]
    fn percentile_interpolates_like_numpy() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(StatsCalculator::percentile(&sorted, 25.0), 1.75);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 75.0), 3.25);
        assert_eq!(StatsCalculator::percentile(&[7.0], 90.0), 7.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn summary_separates_outliers() {
        let values = [10.0, 12.0, 11.0, 13.0, 12.0, 95.0];
        let summary = StatsCalculator::compute_box_summary(&values).unwrap();

        assert_eq!(summary.count, 6);
        assert_eq!(summary.median, 12.0);
        assert_eq!(summary.whisker_low, 10.0);
        assert_eq!(summary.whisker_high, 13.0);
        assert_eq!(summary.outliers, vec![95.0]);
        assert!((summary.mean - 25.5).abs() < 1e-9);
    }

    #[test]
    fn single_value_summary() {
        let summary = StatsCalculator::compute_box_summary(&[30.0]).unwrap();
        assert_eq!(summary.q1, 30.0);
        assert_eq!(summary.q3, 30.0);
        assert_eq!(summary.whisker_low, 30.0);
        assert_eq!(summary.whisker_high, 30.0);
        assert_eq!(summary.std, 0.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn empty_sample_has_no_summary() {
        assert!(StatsCalculator::compute_box_summary(&[]).is_none());
    }

    #[test]
    fn months_come_back_in_calendar_order() {
        let records = vec![
            record(2023, 12, 1, 80.0),
            record(2023, 1, 5, 30.0),
            record(2023, 1, 6, 40.0),
            record(2023, 6, 1, 5.0),
        ];

        let groups = StatsCalculator::group_by_category(&records, CategoryAxis::Month);
        let labels: Vec<&str> = groups.iter().map(|g| g.label).collect();
        assert_eq!(labels, MONTH_NAMES.to_vec());

        assert_eq!(groups[0].values, vec![30.0, 40.0]);
        assert_eq!(groups[0].summary.as_ref().unwrap().median, 35.0);
        assert!(groups[1].summary.is_none());
        assert_eq!(groups[5].values, vec![5.0]);
        assert_eq!(groups[11].values, vec![80.0]);
    }

    #[test]
    fn weekdays_start_on_monday() {
        // 2023-01-02 is a Monday, 2023-01-08 a Sunday
        let records = vec![record(2023, 1, 8, 9.0), record(2023, 1, 2, 3.0)];

        let groups = StatsCalculator::group_by_category(&records, CategoryAxis::Weekday);
        assert_eq!(groups.len(), 7);
        assert_eq!(groups[0].label, "Monday");
        assert_eq!(groups[0].values, vec![3.0]);
        assert_eq!(groups[6].label, "Sunday");
        assert_eq!(groups[6].values, vec![9.0]);
    }
}
