//! Job orchestration — wires provider, pipeline, and sink together.
//!
//! A job is: fetch the raw dataset, run the feature pipeline, persist the
//! enriched table, and report what happened. The report carries a
//! deterministic BLAKE3 hash of the final table so two runs over the same
//! data can be compared without re-reading the output.

use std::path::PathBuf;

use featurelab_core::{
    ColumnData, FeaturePipeline, PipelineError, PipelineObserver, PipelineSummary, Table,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{InputConfig, JobConfig, JobConfigError, OutputConfig, OutputFormat};
use crate::http::HttpCsvProvider;
use crate::provider::{CsvFileProvider, DataError, DatasetProvider, DatasetSource};
use crate::sink::{CsvSink, DatasetSink, ParquetSink, SinkError};
use crate::synthetic::SyntheticProvider;

/// Errors from running a job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("config error: {0}")]
    Config(#[from] JobConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("round-trip validation failed: {0}")]
    Validation(String),
}

/// What a completed job produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub rows: usize,
    pub columns: usize,
    pub source: DatasetSource,
    pub origin: String,
    pub dataset_hash: String,
    pub output_path: PathBuf,
    pub summary: PipelineSummary,
    /// Whether the output passed a round-trip read-back check.
    pub validated: bool,
}

/// Run a complete job: provider → pipeline → sink.
///
/// With `validate` set, the sink output is re-read after writing and
/// checked against the in-memory table (same columns, same row order,
/// same values with unknowns intact).
pub fn run_job(
    config: &JobConfig,
    observer: &dyn PipelineObserver,
    validate: bool,
) -> Result<JobReport, JobError> {
    config.validate()?;

    let provider = build_provider(&config.input, &config.pipeline.date_column);
    let raw = provider.fetch()?;
    let source = raw.source;
    let origin = raw.origin;

    let pipeline = FeaturePipeline::new(config.pipeline.clone()).map_err(PipelineError::Config)?;
    let run = pipeline.run(raw.table, observer)?;

    let sink = build_sink(&config.output, &config.pipeline.date_column);
    sink.write(&run.table)?;

    if validate {
        round_trip_check(sink.as_ref(), &run.table)?;
    }

    Ok(JobReport {
        rows: run.summary.rows,
        columns: run.summary.columns,
        source,
        origin,
        dataset_hash: dataset_hash(&run.table),
        output_path: config.output.path.clone(),
        summary: run.summary,
        validated: validate,
    })
}

/// Resolve the provider for an input config.
pub fn build_provider(input: &InputConfig, date_column: &str) -> Box<dyn DatasetProvider> {
    match input {
        InputConfig::CsvFile { path } => Box::new(CsvFileProvider::new(path, date_column)),
        InputConfig::Http { url } => Box::new(HttpCsvProvider::new(url, date_column)),
        InputConfig::Synthetic { assets, start, end } => {
            Box::new(SyntheticProvider::new(assets.clone(), *start, *end))
        }
    }
}

/// Resolve the sink for an output config.
pub fn build_sink(output: &OutputConfig, date_column: &str) -> Box<dyn DatasetSink> {
    match output.format {
        OutputFormat::Csv => Box::new(CsvSink::new(&output.path, date_column)),
        OutputFormat::Parquet => Box::new(ParquetSink::new(&output.path, date_column)),
    }
}

/// Re-read the sink output and compare against the in-memory table.
fn round_trip_check(sink: &dyn DatasetSink, expected: &Table) -> Result<(), JobError> {
    let actual = sink.read_back()?;
    if actual.n_rows() != expected.n_rows() {
        return Err(JobError::Validation(format!(
            "row count changed: wrote {}, read {}",
            expected.n_rows(),
            actual.n_rows()
        )));
    }
    if actual.column_names() != expected.column_names() {
        return Err(JobError::Validation("column set changed".to_string()));
    }
    if !expected.values_eq(&actual, 1e-9) {
        return Err(JobError::Validation(
            "values changed across the round trip".to_string(),
        ));
    }
    Ok(())
}

/// Compute a deterministic BLAKE3 hash over the whole table.
///
/// Covers column names and every cell in table order; unknown floats hash
/// as the canonical NaN bit pattern, so two identical runs always agree.
pub fn dataset_hash(table: &Table) -> String {
    let mut hasher = blake3::Hasher::new();

    for column in table.columns() {
        hasher.update(column.name.as_bytes());
        hasher.update(&[0]);
        match &column.data {
            ColumnData::Text(values) => {
                for v in values {
                    match v {
                        Some(s) => hasher.update(s.as_bytes()),
                        None => hasher.update(&[0xff]),
                    };
                    hasher.update(&[0]);
                }
            }
            ColumnData::Date(values) => {
                for d in values {
                    hasher.update(d.to_string().as_bytes());
                }
            }
            ColumnData::Float(values) => {
                for v in values {
                    let canonical = if v.is_nan() { f64::NAN } else { *v };
                    hasher.update(&canonical.to_le_bytes());
                }
            }
            ColumnData::Int(values) => {
                for v in values {
                    hasher.update(&v.to_le_bytes());
                }
            }
        }
    }

    hasher.finalize().to_hex().to_string()
}
