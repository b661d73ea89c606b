//! PM2.5 Report - Air-quality CSV cleaning & threshold chart generator
//!
//! Loads an AQICN station export, cleans it, and renders monthly and weekly
//! PM2.5 box plots against the NOM-025 limit and WHO target.
//!
//! ```text
//!  station CSV
//!       │
//!       ▼
//!  ┌──────────┐
//!  │  loader  │  text DataFrame, trimmed headers
//!  └──────────┘
//!       │
//!       ▼
//!  ┌──────────┐
//!  │ cleaner  │  typed date/pollutants, row filter, month & weekday
//!  └──────────┘
//!       │
//!       ▼
//!  ┌──────────┐
//!  │  charts  │  monthly_trend.png, weekly_trend.png
//!  └──────────┘
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;
