//! Dataset provider trait and CSV decoding.
//!
//! Providers abstract over where the raw dataset comes from (local CSV,
//! HTTP download, synthetic generation) so the job runner can swap
//! implementations and tests can stay offline. The provider decides each
//! column's storage kind exactly once: a non-date column whose non-empty
//! values all parse as numbers becomes a float column (empty cells are the
//! unknown marker); anything else stays text.

use std::fs;
use std::path::{Path, PathBuf};

use featurelab_core::{ColumnData, ColumnRole, Table, TableError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for dataset acquisition.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("http request failed: {0}")]
    Http(String),

    #[error("csv decode error: {0}")]
    Csv(String),

    #[error("dataset has no columns")]
    Empty,

    #[error("date column '{0}' missing from dataset header")]
    MissingDateColumn(String),

    #[error("table construction failed: {0}")]
    Table(#[from] TableError),
}

/// Where the dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetSource {
    LocalFile,
    Http,
    Synthetic,
}

/// A fetched dataset with provenance.
#[derive(Debug)]
pub struct RawDataset {
    pub table: Table,
    pub source: DatasetSource,
    /// Path, URL, or generator description.
    pub origin: String,
}

/// Trait for dataset providers (CSV file, HTTP, synthetic).
pub trait DatasetProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the dataset as a wide table.
    fn fetch(&self) -> Result<RawDataset, DataError>;
}

/// Provider that reads a local CSV file.
pub struct CsvFileProvider {
    path: PathBuf,
    date_column: String,
}

impl CsvFileProvider {
    pub fn new(path: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.into(),
        }
    }
}

impl DatasetProvider for CsvFileProvider {
    fn name(&self) -> &str {
        "csv-file"
    }

    fn fetch(&self) -> Result<RawDataset, DataError> {
        let text = fs::read_to_string(&self.path).map_err(|e| DataError::Read {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let table = decode_csv(&text, &self.date_column)?;
        Ok(RawDataset {
            table,
            source: DatasetSource::LocalFile,
            origin: self.path.display().to_string(),
        })
    }
}

/// Decode CSV text into a provider-shaped table.
///
/// The header row gives column names. The date column keeps its raw text
/// for the cleaner to parse; every other column is float if all its
/// non-empty values parse as f64, text otherwise.
pub fn decode_csv(text: &str, date_column: &str) -> Result<Table, DataError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(DataError::Empty);
    }
    if !headers.iter().any(|h| h == date_column) {
        return Err(DataError::MissingDateColumn(date_column.to_string()));
    }

    // Column-major cells; empty strings are missing.
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
        for (i, cell) in cells.iter_mut().enumerate() {
            let value = record.get(i).unwrap_or("").trim();
            cell.push(if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            });
        }
    }

    let mut table = Table::new();
    for (header, values) in headers.iter().zip(cells) {
        if header == date_column {
            table.push_column(header, ColumnRole::Date, ColumnData::Text(values))?;
        } else {
            table.push_column(header, ColumnRole::Asset, type_tagged(values))?;
        }
    }
    Ok(table)
}

/// Decide a column's storage kind once, at construction.
fn type_tagged(values: Vec<Option<String>>) -> ColumnData {
    let numeric = values
        .iter()
        .flatten()
        .all(|v| v.parse::<f64>().is_ok());
    if numeric {
        ColumnData::Float(
            values
                .iter()
                .map(|v| match v {
                    Some(s) => s.parse::<f64>().unwrap_or(f64::NAN),
                    None => f64::NAN,
                })
                .collect(),
        )
    } else {
        ColumnData::Text(values)
    }
}

/// Convenience used by sinks: re-decode with the same typing rules.
pub(crate) fn decode_csv_file(path: &Path, date_column: &str) -> Result<Table, DataError> {
    let text = fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    decode_csv(&text, date_column)
}
