//! Calendar Names
//! Fixed English month and weekday names, independent of the host locale.

use chrono::{Datelike, NaiveDateTime};

/// Canonical month order (January first)
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Canonical weekday order (Monday first)
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Full English month name of a timestamp.
pub fn month_name(date: &NaiveDateTime) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Full English weekday name of a timestamp.
pub fn weekday_name(date: &NaiveDateTime) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}
