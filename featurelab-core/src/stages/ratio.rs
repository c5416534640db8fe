//! Ratio stage: configured cross-asset price ratios.
//!
//! Pairs are data-driven configuration, matched by exact column name. A
//! pair whose columns are missing is skipped silently; a zero or unknown
//! denominator yields unknown, never infinity.

use super::{Stage, StageError};
use crate::config::RatioPair;
use crate::table::{ColumnData, ColumnRole, Table};

#[derive(Debug, Clone)]
pub struct RatioCalculator {
    pairs: Vec<RatioPair>,
}

impl RatioCalculator {
    pub fn new(pairs: Vec<RatioPair>) -> Self {
        Self { pairs }
    }
}

impl Stage for RatioCalculator {
    fn name(&self) -> &'static str {
        "ratios"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let mut out = table.clone();
        for pair in &self.pairs {
            let (Some(numerator), Some(denominator)) = (
                table.floats(&pair.numerator),
                table.floats(&pair.denominator),
            ) else {
                continue;
            };

            let values: Vec<f64> = numerator
                .iter()
                .zip(denominator)
                .map(|(&n, &d)| {
                    if d.is_nan() || d == 0.0 {
                        f64::NAN
                    } else {
                        n / d
                    }
                })
                .collect();

            out.push_column(
                format!("{}_{}_Ratio", pair.numerator, pair.denominator),
                ColumnRole::Derived,
                ColumnData::Float(values),
            )?;
        }
        Ok(out)
    }
}
