//! Volatility stage: rolling standard deviation of return series.
//!
//! Scans `_Return` columns (not `_Cumulative_Return`) and appends
//! `{asset}_Volatility_{window}d` per return series. Sample standard
//! deviation (n-1 denominator); a value is produced only when the whole
//! trailing window is defined.

use rayon::prelude::*;

use super::{Stage, StageError};
use crate::rolling::rolling_std;
use crate::table::{Column, ColumnData, ColumnRole, Table};

const RETURN_SUFFIX: &str = "_Return";
const CUMULATIVE_SUFFIX: &str = "_Cumulative_Return";

#[derive(Debug, Clone)]
pub struct VolatilityCalculator {
    window: usize,
}

impl VolatilityCalculator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Stage for VolatilityCalculator {
    fn name(&self) -> &'static str {
        "volatility"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let candidates: Vec<&Column> = table
            .columns()
            .filter(|c| {
                c.name.ends_with(RETURN_SUFFIX)
                    && !c.name.ends_with(CUMULATIVE_SUFFIX)
                    && c.floats().is_some()
            })
            .collect();

        let window = self.window;
        let series: Vec<(String, Vec<f64>)> = candidates
            .par_iter()
            .map(|column| {
                let asset = column
                    .name
                    .strip_suffix(RETURN_SUFFIX)
                    .unwrap_or(&column.name);
                let values = column.floats().unwrap_or_default();
                (
                    format!("{asset}_Volatility_{window}d"),
                    rolling_std(values, window),
                )
            })
            .collect();

        let mut out = table.clone();
        for (name, values) in series {
            out.push_column(name, ColumnRole::Derived, ColumnData::Float(values))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{assert_approx, make_clean_table, ReturnCalculator, DEFAULT_EPSILON};
    use crate::table::ColumnRole;

    fn table_with_returns(values: &[f64]) -> Table {
        let dates: Vec<String> = (1..=values.len())
            .map(|d| format!("2020-01-{d:02}"))
            .collect();
        let date_refs: Vec<&str> = dates.iter().map(String::as_str).collect();
        let table = make_clean_table(&date_refs, &[("Gold", values)]);
        ReturnCalculator::new().apply(&table).unwrap()
    }

    #[test]
    fn sample_std_over_returns() {
        // Levels 100 → 110 → 121 → 133.1: returns are 10% each step.
        let with_returns = table_with_returns(&[100.0, 110.0, 121.0, 133.1]);
        let out = VolatilityCalculator::new(3).apply(&with_returns).unwrap();
        let vol = out.floats("Gold_Volatility_3d").unwrap();

        // Window needs three defined returns: rows 1..=3.
        assert!(vol[0].is_nan());
        assert!(vol[1].is_nan());
        assert!(vol[2].is_nan());
        assert_approx(vol[3], 0.0, 1e-9);
    }

    #[test]
    fn known_sample_std_value() {
        // Returns [100%, -50%, 100%]: mean 50, deviations 50,-100,50,
        // sample variance (2500+10000+2500)/2 = 7500.
        let with_returns = table_with_returns(&[1.0, 2.0, 1.0, 2.0]);
        let out = VolatilityCalculator::new(3).apply(&with_returns).unwrap();
        let vol = out.floats("Gold_Volatility_3d").unwrap();
        assert_approx(vol[3], 7500.0_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn cumulative_return_columns_are_not_scanned() {
        let with_returns = table_with_returns(&[1.0, 2.0, 3.0]);
        let out = VolatilityCalculator::new(2).apply(&with_returns).unwrap();
        assert!(out.contains("Gold_Volatility_2d"));
        assert!(!out.contains("Gold_Cumulative_Volatility_2d"));
        // Exactly one volatility column was added.
        let added = out
            .column_names()
            .iter()
            .filter(|n| n.contains("_Volatility_"))
            .count();
        assert_eq!(added, 1);
    }

    #[test]
    fn asset_literally_named_return_is_scanned_by_suffix() {
        // Suffix scan is by name, as the derived-column naming contract
        // promises downstream consumers.
        let mut table = make_clean_table(&["2020-01-01", "2020-01-02"], &[]);
        table
            .push_column(
                "Fund_Return",
                ColumnRole::Derived,
                ColumnData::Float(vec![1.0, 2.0]),
            )
            .unwrap();
        let out = VolatilityCalculator::new(2).apply(&table).unwrap();
        assert!(out.contains("Fund_Volatility_2d"));
    }
}
