//! Report Configuration
//! Input location, regulatory thresholds and chart annotation settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default input dataset (AQICN export for the Mexicali municipal station)
pub const DEFAULT_INPUT_PATH: &str =
    "data/palacio-municipal, municipio de mexicali, baja california - municipal-air-quality.csv";
/// NOM-025-SSA1-2014 PM2.5 limit (µg/m³)
pub const DEFAULT_LIMIT_NOM: f64 = 45.0;
/// WHO PM2.5 target (µg/m³)
pub const DEFAULT_LIMIT_WHO: f64 = 12.0;
pub const DEFAULT_WATERMARK_TEXT: &str = "© Analysis by [YOUR NAME] - AQICN data";
pub const DEFAULT_OUTPUT_DIR: &str = "images";
pub const DEFAULT_DPI: u32 = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by every pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub limit_nom: f64,
    pub limit_who: f64,
    pub watermark_text: String,
    pub dpi: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            limit_nom: DEFAULT_LIMIT_NOM,
            limit_who: DEFAULT_LIMIT_WHO,
            watermark_text: DEFAULT_WATERMARK_TEXT.to_string(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl ReportConfig {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Use `path` when it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Pixels per typographic point at the configured resolution.
    pub fn px_per_pt(&self) -> f64 {
        self.dpi as f64 / 72.0
    }
}
