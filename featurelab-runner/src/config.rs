//! Serializable job configuration.
//!
//! A job file is TOML with three sections: `[input]`, `[output]`, and an
//! optional `[pipeline]` table that maps straight onto `PipelineConfig`
//! (every pipeline field has a default).
//!
//! ```toml
//! [input]
//! kind = "CSV_FILE"
//! path = "data/financial_data.csv"
//!
//! [output]
//! path = "out/features.csv"
//! format = "CSV"
//!
//! [pipeline]
//! moving_average_windows = [7, 30, 90]
//! volatility_window = 30
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use featurelab_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a job config.
#[derive(Debug, Error)]
pub enum JobConfigError {
    #[error("failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid TOML: {0}")]
    Parse(String),

    #[error("pipeline config: {0}")]
    Pipeline(#[from] featurelab_core::ConfigError),

    #[error("synthetic input needs at least one asset")]
    NoAssets,

    #[error("synthetic input start {start} is after end {end}")]
    BadDateRange { start: NaiveDate, end: NaiveDate },
}

/// Where the raw dataset comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputConfig {
    /// Read a local CSV file.
    CsvFile { path: PathBuf },

    /// Download a CSV over HTTP.
    Http { url: String },

    /// Generate a deterministic synthetic dataset.
    Synthetic {
        assets: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Output file format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

/// Where and how the enriched table is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
}

/// A complete job: input, output, pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl JobConfig {
    pub fn from_toml(text: &str) -> Result<Self, JobConfigError> {
        let config: JobConfig =
            toml::from_str(text).map_err(|e| JobConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_path(path: &Path) -> Result<Self, JobConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| JobConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), JobConfigError> {
        self.pipeline.validate()?;
        if let InputConfig::Synthetic { assets, start, end } = &self.input {
            if assets.is_empty() {
                return Err(JobConfigError::NoAssets);
            }
            if start > end {
                return Err(JobConfigError::BadDateRange {
                    start: *start,
                    end: *end,
                });
            }
        }
        Ok(())
    }
}
