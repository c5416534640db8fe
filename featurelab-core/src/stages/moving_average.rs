//! Moving-average stage: trailing simple moving averages per asset.
//!
//! Averages are computed on levels, so only asset-role float columns are
//! candidates; return series and calendar columns are never rescanned.
//! Appends `{asset}_MA_{window}` for every configured window, windows
//! ascending within each asset.

use rayon::prelude::*;

use super::{Stage, StageError};
use crate::rolling::rolling_mean;
use crate::table::{Column, ColumnData, ColumnRole, Table};

#[derive(Debug, Clone)]
pub struct MovingAverageCalculator {
    /// Window sizes, ascending and deduplicated.
    windows: Vec<usize>,
}

impl MovingAverageCalculator {
    pub fn new(windows: impl IntoIterator<Item = usize>) -> Self {
        let mut windows: Vec<usize> = windows.into_iter().collect();
        windows.sort_unstable();
        windows.dedup();
        Self { windows }
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }
}

impl Stage for MovingAverageCalculator {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let candidates: Vec<&Column> = table
            .columns()
            .filter(|c| c.role == ColumnRole::Asset && c.floats().is_some())
            .collect();

        let series: Vec<Vec<(String, Vec<f64>)>> = candidates
            .par_iter()
            .map(|column| {
                let values = column.floats().unwrap_or_default();
                self.windows
                    .iter()
                    .map(|&w| (format!("{}_MA_{w}", column.name), rolling_mean(values, w)))
                    .collect()
            })
            .collect();

        let mut out = table.clone();
        for per_column in series {
            for (name, values) in per_column {
                out.push_column(name, ColumnRole::Derived, ColumnData::Float(values))?;
            }
        }
        Ok(out)
    }
}
