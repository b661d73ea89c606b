//! PM2.5 Report binary: runs the full pipeline with `report.json` settings
//! when present, defaults otherwise.

use pm25_report::config::ReportConfig;
use pm25_report::pipeline;
use std::path::Path;

/// Optional settings file read from the working directory
const CONFIG_FILE: &str = "report.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    let result = ReportConfig::load_or_default(Path::new(CONFIG_FILE))
        .map_err(anyhow::Error::from)
        .and_then(|config| pipeline::run(&config));

    match result {
        Ok(outputs) => {
            log::info!(
                "Analysis finished: {} records, {} charts written",
                outputs.records,
                outputs.charts.len()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("{e:#}");
            Err(e)
        }
    }
}
