//! Cleaning stage: date parsing, sorting, forward-fill.
//!
//! Runs first. Parses the raw date column into calendar dates (any
//! unparseable or missing date aborts the pipeline), stable-sorts rows
//! ascending by date, then forward-fills missing values in every column in
//! the sorted order. Leading missing values stay missing — the unknown
//! marker only resolves once a prior defined value exists.

use chrono::NaiveDate;

use super::{Stage, StageError};
use crate::table::{ColumnData, ColumnRole, Table};

/// Accepted date formats, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone)]
pub struct Cleaner {
    date_column: String,
}

impl Cleaner {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
        }
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }

    /// Parse the date column, or pass it through if already parsed.
    fn parsed_dates(&self, table: &Table) -> Result<Vec<NaiveDate>, StageError> {
        let column = table
            .column(&self.date_column)
            .ok_or_else(|| StageError::MissingDateColumn(self.date_column.clone()))?;

        match &column.data {
            ColumnData::Date(dates) => Ok(dates.clone()),
            ColumnData::Text(values) => values
                .iter()
                .enumerate()
                .map(|(row, value)| match value {
                    None => Err(StageError::MissingDate { row }),
                    Some(raw) => Self::parse_date(raw).ok_or_else(|| StageError::DateParse {
                        row,
                        value: raw.clone(),
                    }),
                })
                .collect(),
            other => Err(StageError::DateColumnKind {
                name: self.date_column.clone(),
                kind: other.kind_name(),
            }),
        }
    }
}

impl Stage for Cleaner {
    fn name(&self) -> &'static str {
        "cleaner"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let dates = self.parsed_dates(table)?;

        // Stable sort: rows with equal dates keep their input order.
        let mut order: Vec<usize> = (0..table.n_rows()).collect();
        order.sort_by_key(|&i| dates[i]);

        let mut out = Table::new();
        for column in table.columns() {
            if column.name == self.date_column {
                let sorted: Vec<NaiveDate> = order.iter().map(|&i| dates[i]).collect();
                out.push_column(&column.name, ColumnRole::Date, ColumnData::Date(sorted))?;
            } else {
                let gathered = column.data.gather(&order);
                out.push_column(&column.name, column.role, forward_fill(gathered))?;
            }
        }
        Ok(out)
    }
}

/// Replace each missing value with the nearest prior defined value.
fn forward_fill(data: ColumnData) -> ColumnData {
    match data {
        ColumnData::Float(mut values) => {
            let mut last = f64::NAN;
            for v in values.iter_mut() {
                if v.is_nan() {
                    *v = last;
                } else {
                    last = *v;
                }
            }
            ColumnData::Float(values)
        }
        ColumnData::Text(mut values) => {
            let mut last: Option<String> = None;
            for v in values.iter_mut() {
                match v {
                    None => *v = last.clone(),
                    Some(s) => last = Some(s.clone()),
                }
            }
            ColumnData::Text(values)
        }
        // Date and int columns have no missing representation.
        other => other,
    }
}
