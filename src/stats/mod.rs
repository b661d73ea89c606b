//! Stats module - Per-category distribution summaries

mod calculator;

pub use calculator::{BoxSummary, CategoryAxis, CategoryStats, StatsCalculator};
