//! Report Pipeline
//! Runs load → clean → monthly chart → weekly chart, stopping at the first
//! fatal error so no chart is written from a failed upstream stage.

use crate::charts::StaticChartRenderer;
use crate::config::ReportConfig;
use crate::data::{DataCleaner, DataLoader};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// What a successful run produced.
#[derive(Debug)]
pub struct ReportOutputs {
    pub records: usize,
    pub charts: Vec<PathBuf>,
}

pub fn run(config: &ReportConfig) -> Result<ReportOutputs> {
    let raw = DataLoader::load_csv(&config.input_path).context("Loading air-quality data")?;
    let cleaned = DataCleaner::clean(raw).context("Cleaning air-quality data")?;
    let records = DataCleaner::to_records(&cleaned)?;

    let monthly = StaticChartRenderer::render_monthly(&records, config)
        .context("Rendering monthly chart")?;
    let weekly =
        StaticChartRenderer::render_weekly(&records, config).context("Rendering weekly chart")?;

    Ok(ReportOutputs {
        records: records.len(),
        charts: vec![monthly, weekly],
    })
}
