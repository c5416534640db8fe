//! Dataset sinks.
//!
//! A sink persists the final table and can read it back, so callers can
//! validate a round trip (same columns, same row order) after writing.
//! Storage kinds come back coarser than they went in — CSV read-back
//! re-types numeric text as floats — which is why validation compares
//! values, not storage kinds.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use featurelab_core::{ColumnData, ColumnRole, Table};
use polars::prelude::*;
use thiserror::Error;

use crate::provider::decode_csv_file;

/// Errors from persistence.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("failed to read back {path}: {reason}")]
    ReadBack { path: String, reason: String },

    #[error("csv error: {0}")]
    Csv(String),

    #[error("parquet error: {0}")]
    Parquet(String),
}

/// Trait for dataset sinks.
pub trait DatasetSink: Send + Sync {
    /// Human-readable name of this sink.
    fn name(&self) -> &str;

    /// Where the table is persisted.
    fn path(&self) -> &Path;

    /// Persist the table.
    fn write(&self, table: &Table) -> Result<(), SinkError>;

    /// Re-read what was written, for round-trip validation.
    fn read_back(&self) -> Result<Table, SinkError>;
}

// ─── CSV sink ───────────────────────────────────────────────────────

/// Sink that writes one CSV file; unknown values become empty cells.
pub struct CsvSink {
    path: PathBuf,
    date_column: String,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.into(),
        }
    }
}

impl DatasetSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, table: &Table) -> Result<(), SinkError> {
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| SinkError::Write {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        writer
            .write_record(table.column_names())
            .map_err(|e| SinkError::Csv(e.to_string()))?;

        for row in 0..table.n_rows() {
            let record: Vec<String> = table
                .columns()
                .map(|column| csv_cell(&column.data, row))
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| SinkError::Csv(e.to_string()))?;
        }

        writer.flush().map_err(|e| SinkError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn read_back(&self) -> Result<Table, SinkError> {
        decode_csv_file(&self.path, &self.date_column).map_err(|e| SinkError::ReadBack {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn csv_cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        ColumnData::Date(v) => v[row].to_string(),
        ColumnData::Float(v) => {
            if v[row].is_nan() {
                String::new()
            } else {
                v[row].to_string()
            }
        }
        ColumnData::Int(v) => v[row].to_string(),
    }
}

// ─── Parquet sink ───────────────────────────────────────────────────

/// Sink that writes one Parquet file.
///
/// Writes are atomic: write to .tmp, rename into place.
pub struct ParquetSink {
    path: PathBuf,
    date_column: String,
}

impl ParquetSink {
    pub fn new(path: impl Into<PathBuf>, date_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date_column: date_column.into(),
        }
    }
}

impl DatasetSink for ParquetSink {
    fn name(&self) -> &str {
        "parquet"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, table: &Table) -> Result<(), SinkError> {
        let df = table_to_dataframe(table)?;
        let tmp_path = self.path.with_extension("parquet.tmp");

        write_parquet(&df, &tmp_path)?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            SinkError::Write {
                path: self.path.display().to_string(),
                reason: format!("atomic rename failed: {e}"),
            }
        })
    }

    fn read_back(&self) -> Result<Table, SinkError> {
        let file = fs::File::open(&self.path).map_err(|e| SinkError::ReadBack {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| SinkError::Parquet(format!("read: {e}")))?;
        dataframe_to_table(&df, &self.date_column)
    }
}

/// Convert a table to a Polars DataFrame.
fn table_to_dataframe(table: &Table) -> Result<DataFrame, SinkError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    let mut columns: Vec<Column> = Vec::with_capacity(table.n_cols());

    for col in table.columns() {
        let name: PlSmallStr = col.name.as_str().into();
        let column = match &col.data {
            ColumnData::Date(dates) => {
                let days: Vec<i32> = dates.iter().map(|d| (*d - epoch).num_days() as i32).collect();
                Column::new(name, days)
                    .cast(&DataType::Date)
                    .map_err(|e| SinkError::Parquet(format!("date cast: {e}")))?
            }
            ColumnData::Float(values) => Column::new(name, values.clone()),
            ColumnData::Int(values) => Column::new(name, values.clone()),
            ColumnData::Text(values) => Column::new(name, values.clone()),
        };
        columns.push(column);
    }

    DataFrame::new(columns).map_err(|e| SinkError::Parquet(format!("dataframe creation: {e}")))
}

/// Write a DataFrame to a Parquet file.
fn write_parquet(df: &DataFrame, path: &Path) -> Result<(), SinkError> {
    let file = fs::File::create(path).map_err(|e| SinkError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    ParquetWriter::new(file)
        .finish(&mut df.clone())
        .map_err(|e| SinkError::Parquet(format!("write: {e}")))?;
    Ok(())
}

/// Convert a DataFrame back to a table.
///
/// Roles are re-derived coarsely (the sink output is terminal): the date
/// column keeps its role, int columns read back as calendar attributes,
/// everything else as asset columns.
fn dataframe_to_table(df: &DataFrame, date_column: &str) -> Result<Table, SinkError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    let mut table = Table::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        let n = col.len();
        let (role, data) = match col.dtype() {
            DataType::Date => {
                let ca = col
                    .date()
                    .map_err(|e| SinkError::Parquet(format!("date column: {e}")))?;
                let mut dates = Vec::with_capacity(n);
                for i in 0..n {
                    let days = ca.get(i).ok_or_else(|| {
                        SinkError::Parquet(format!("null date at row {i} in '{name}'"))
                    })?;
                    dates.push(epoch + chrono::Duration::days(days as i64));
                }
                (ColumnRole::Date, ColumnData::Date(dates))
            }
            DataType::Float64 => {
                let ca = col
                    .f64()
                    .map_err(|e| SinkError::Parquet(format!("float column: {e}")))?;
                let values: Vec<f64> = (0..n).map(|i| ca.get(i).unwrap_or(f64::NAN)).collect();
                (ColumnRole::Asset, ColumnData::Float(values))
            }
            DataType::Int32 => {
                let ca = col
                    .i32()
                    .map_err(|e| SinkError::Parquet(format!("int column: {e}")))?;
                let values: Vec<i32> = (0..n).map(|i| ca.get(i).unwrap_or(0)).collect();
                (ColumnRole::Calendar, ColumnData::Int(values))
            }
            DataType::String => {
                let ca = col
                    .str()
                    .map_err(|e| SinkError::Parquet(format!("string column: {e}")))?;
                let values: Vec<Option<String>> =
                    (0..n).map(|i| ca.get(i).map(str::to_string)).collect();
                (ColumnRole::Asset, ColumnData::Text(values))
            }
            other => {
                return Err(SinkError::Parquet(format!(
                    "unexpected dtype {other} in column '{name}'"
                )))
            }
        };

        let role = if name == date_column {
            ColumnRole::Date
        } else {
            role
        };
        table
            .push_column(name, role, data)
            .map_err(|e| SinkError::Parquet(e.to_string()))?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new();
        table
            .push_column(
                "Date",
                ColumnRole::Date,
                ColumnData::Date(vec![
                    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
                ]),
            )
            .unwrap();
        table
            .push_column(
                "Gold",
                ColumnRole::Asset,
                ColumnData::Float(vec![100.25, f64::NAN]),
            )
            .unwrap();
        table
            .push_column("Year", ColumnRole::Calendar, ColumnData::Int(vec![2020, 2020]))
            .unwrap();
        table
            .push_column(
                "Exchange",
                ColumnRole::Asset,
                ColumnData::Text(vec![Some("LBMA".into()), None]),
            )
            .unwrap();
        table
    }

    #[test]
    fn csv_round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(dir.path().join("out.csv"), "Date");
        let table = sample_table();

        sink.write(&table).unwrap();
        let back = sink.read_back().unwrap();

        assert!(table.values_eq(&back, 1e-12));
        assert_eq!(back.column_names(), table.column_names());
    }

    #[test]
    fn csv_unknowns_become_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sink = CsvSink::new(&path, "Date");
        sink.write(&sample_table()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let second_row = text.lines().nth(2).unwrap();
        assert_eq!(second_row, "2020-01-02,,2020,");
    }

    #[test]
    fn parquet_round_trip_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ParquetSink::new(dir.path().join("out.parquet"), "Date");
        let table = sample_table();

        sink.write(&table).unwrap();
        let back = sink.read_back().unwrap();

        assert!(table.values_eq(&back, 0.0));
        assert_eq!(back.column_names(), table.column_names());
        assert_eq!(back.column("Date").unwrap().role, ColumnRole::Date);
    }

    #[test]
    fn parquet_write_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.parquet");
        let sink = ParquetSink::new(&path, "Date");
        sink.write(&sample_table()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("parquet.tmp").exists());
    }
}
