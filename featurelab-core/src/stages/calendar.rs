//! Calendar feature stage.
//!
//! Derives Year, Month, Quarter, Day_of_Week (0=Monday..6=Sunday), and
//! Week_of_Year (ISO week, 1-53) from the parsed date column. Pure function
//! of the date; requires the cleaner to have run.

use chrono::Datelike;

use super::{Stage, StageError};
use crate::table::{ColumnData, ColumnRole, Table};

/// Names of the five calendar columns, in append order.
pub const CALENDAR_COLUMNS: [&str; 5] =
    ["Year", "Month", "Quarter", "Day_of_Week", "Week_of_Year"];

#[derive(Debug, Clone)]
pub struct CalendarFeaturizer {
    date_column: String,
}

impl CalendarFeaturizer {
    pub fn new(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
        }
    }
}

impl Stage for CalendarFeaturizer {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let column = table
            .column(&self.date_column)
            .ok_or_else(|| StageError::MissingDateColumn(self.date_column.clone()))?;
        let dates = match &column.data {
            ColumnData::Date(dates) => dates,
            ColumnData::Text(_) => {
                return Err(StageError::DateColumnNotParsed(self.date_column.clone()))
            }
            other => {
                return Err(StageError::DateColumnKind {
                    name: self.date_column.clone(),
                    kind: other.kind_name(),
                })
            }
        };

        let years: Vec<i32> = dates.iter().map(|d| d.year()).collect();
        let months: Vec<i32> = dates.iter().map(|d| d.month() as i32).collect();
        let quarters: Vec<i32> = months.iter().map(|m| (m - 1) / 3 + 1).collect();
        let weekdays: Vec<i32> = dates
            .iter()
            .map(|d| d.weekday().num_days_from_monday() as i32)
            .collect();
        let weeks: Vec<i32> = dates.iter().map(|d| d.iso_week().week() as i32).collect();

        let mut out = table.clone();
        for (name, values) in CALENDAR_COLUMNS
            .into_iter()
            .zip([years, months, quarters, weekdays, weeks])
        {
            out.push_column(name, ColumnRole::Calendar, ColumnData::Int(values))?;
        }
        Ok(out)
    }
}
