//! Return stage: per-asset percentage and cumulative returns.
//!
//! Scans asset-role float columns only; text columns and anything a prior
//! stage derived are not candidates. Appends `{asset}_Return` and
//! `{asset}_Cumulative_Return` per candidate, leaving the level column
//! untouched.

use rayon::prelude::*;

use super::{Stage, StageError};
use crate::table::{Column, ColumnData, ColumnRole, Table};

#[derive(Debug, Clone, Default)]
pub struct ReturnCalculator;

impl ReturnCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for ReturnCalculator {
    fn name(&self) -> &'static str {
        "returns"
    }

    fn apply(&self, table: &Table) -> Result<Table, StageError> {
        let candidates: Vec<&Column> = table
            .columns()
            .filter(|c| c.role == ColumnRole::Asset && c.floats().is_some())
            .collect();

        // Per-column work is independent; results are assembled in candidate
        // order, so the output is identical to a sequential computation.
        let series: Vec<(String, Vec<f64>, Vec<f64>)> = candidates
            .par_iter()
            .map(|column| {
                let values = column.floats().unwrap_or_default();
                let returns = pct_change(values);
                let cumulative = compound(&returns);
                (column.name.clone(), returns, cumulative)
            })
            .collect();

        let mut out = table.clone();
        for (name, returns, cumulative) in series {
            out.push_column(
                format!("{name}_Return"),
                ColumnRole::Derived,
                ColumnData::Float(returns),
            )?;
            out.push_column(
                format!("{name}_Cumulative_Return"),
                ColumnRole::Derived,
                ColumnData::Float(cumulative),
            )?;
        }
        Ok(out)
    }
}

/// Percentage change against the previous row.
///
/// Unknown at row 0, and wherever the previous value is unknown or zero —
/// a zero denominator yields unknown, never infinity.
pub(crate) fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        let prev = values[i - 1];
        if prev.is_nan() || prev == 0.0 {
            continue;
        }
        out[i] = (values[i] - prev) / prev * 100.0;
    }
    out
}

/// Compounded growth over the defined returns.
///
/// Unknown at rows whose per-row return is unknown; the running product
/// continues across those gaps once it has started.
pub(crate) fn compound(returns: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; returns.len()];
    let mut product: Option<f64> = None;
    for (i, r) in returns.iter().enumerate() {
        if r.is_nan() {
            continue;
        }
        let p = product.unwrap_or(1.0) * (1.0 + r / 100.0);
        product = Some(p);
        out[i] = (p - 1.0) * 100.0;
    }
    out
}
