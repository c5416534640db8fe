//! The six transformation stages.
//!
//! Every stage implements the `Stage` trait: it reads one table value and
//! returns a new one, appending derived columns and never mutating its
//! input. The orchestrator in `pipeline` runs them in fixed order:
//! cleaner → calendar → returns → moving averages → volatility → ratios.

pub mod calendar;
pub mod cleaner;
pub mod moving_average;
pub mod ratio;
pub mod returns;
pub mod volatility;

pub use calendar::CalendarFeaturizer;
pub use cleaner::Cleaner;
pub use moving_average::MovingAverageCalculator;
pub use ratio::RatioCalculator;
pub use returns::ReturnCalculator;
pub use volatility::VolatilityCalculator;

use crate::table::{Table, TableError};
use thiserror::Error;

/// Errors a stage can fail with. All of these abort the pipeline.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("date column '{0}' not found")]
    MissingDateColumn(String),

    #[error("row {row}: missing date value")]
    MissingDate { row: usize },

    #[error("row {row}: unparseable date value '{value}'")]
    DateParse { row: usize, value: String },

    #[error("date column '{0}' has not been parsed (run the cleaner first)")]
    DateColumnNotParsed(String),

    #[error("date column '{name}' holds {kind} values, expected text or dates")]
    DateColumnKind { name: String, kind: &'static str },

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// A single transformation step over a table value.
pub trait Stage: Send + Sync {
    /// Stable stage name used in progress reporting and errors.
    fn name(&self) -> &'static str;

    /// Produce the transformed table. The input is left untouched.
    fn apply(&self, table: &Table) -> Result<Table, StageError>;
}

/// Build a provider-shaped table from raw date strings and float asset
/// columns, for testing stages in isolation.
#[cfg(test)]
pub fn make_table(dates: &[&str], assets: &[(&str, &[f64])]) -> Table {
    use crate::table::{ColumnData, ColumnRole};

    let mut table = Table::new();
    table
        .push_column(
            "Date",
            ColumnRole::Date,
            ColumnData::Text(dates.iter().map(|d| Some((*d).to_string())).collect()),
        )
        .unwrap();
    for (name, values) in assets {
        table
            .push_column(*name, ColumnRole::Asset, ColumnData::Float(values.to_vec()))
            .unwrap();
    }
    table
}

/// `make_table` followed by the cleaner, for stages that need parsed dates.
#[cfg(test)]
pub fn make_clean_table(dates: &[&str], assets: &[(&str, &[f64])]) -> Table {
    Cleaner::new("Date").apply(&make_table(dates, assets)).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for stage tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
