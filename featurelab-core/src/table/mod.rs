//! The wide table value passed between pipeline stages.
//!
//! A `Table` is an ordered sequence of named, role-tagged columns of equal
//! length. Stages consume a table by reference and produce a new table;
//! columns are only ever appended, never overwritten or reordered. Columns
//! are immutable once appended and held behind `Arc`, so the per-stage
//! "copy" shares column storage — cloning a table costs one pointer per
//! column, not a duplicate of the data.

pub mod column;

pub use column::{Column, ColumnData, ColumnRole};

use std::sync::Arc;

use thiserror::Error;

/// Errors from table construction and access.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{name}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' not found")]
    ColumnNotFound(String),
}

/// An ordered, fixed-length collection of named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Arc<Column>>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count; later columns
    /// must match it. Duplicate names are rejected — derived columns never
    /// overwrite existing ones.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        role: ColumnRole,
        data: ColumnData,
    ) -> Result<(), TableError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.rows = data.len();
        } else if data.len() != self.rows {
            return Err(TableError::LengthMismatch {
                name,
                expected: self.rows,
                actual: data.len(),
            });
        }
        self.columns.push(Arc::new(Column::new(name, role, data)));
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(Arc::as_ref)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter().map(Arc::as_ref)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// How many columns share storage with `other` (same allocation).
    ///
    /// Diagnostic for the structural-sharing contract; stages append, they
    /// never rewrite what they inherited.
    pub fn shared_columns_with(&self, other: &Table) -> usize {
        self.columns
            .iter()
            .filter(|a| other.columns.iter().any(|b| Arc::ptr_eq(a, b)))
            .count()
    }

    /// Float values of a named column, if it holds floats.
    pub fn floats(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::floats)
    }

    /// Dates of a named column, if it holds parsed dates.
    pub fn dates(&self, name: &str) -> Option<&[chrono::NaiveDate]> {
        self.column(name).and_then(Column::dates)
    }

    /// Value-level equality with unknown-aware float comparison.
    ///
    /// Used for sink round-trip validation, where storage kinds may come
    /// back coarser than they went in: a numeric column matches a numeric
    /// column (int or float) when values agree within `epsilon` and
    /// unknowns line up, and a date column matches a text column holding
    /// the ISO-formatted dates. Column names and order must match exactly.
    pub fn values_eq(&self, other: &Table, epsilon: f64) -> bool {
        if self.rows != other.rows || self.columns.len() != other.columns.len() {
            return false;
        }
        self.columns
            .iter()
            .zip(&other.columns)
            .all(|(a, b)| a.name == b.name && column_values_eq(&a.data, &b.data, epsilon))
    }
}

fn numeric_view(data: &ColumnData) -> Option<Vec<f64>> {
    match data {
        ColumnData::Float(v) => Some(v.clone()),
        ColumnData::Int(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        _ => None,
    }
}

fn text_view(data: &ColumnData) -> Option<Vec<Option<String>>> {
    match data {
        ColumnData::Text(v) => Some(v.clone()),
        ColumnData::Date(v) => Some(
            v.iter()
                .map(|d| Some(d.format("%Y-%m-%d").to_string()))
                .collect(),
        ),
        _ => None,
    }
}

fn column_values_eq(a: &ColumnData, b: &ColumnData, epsilon: f64) -> bool {
    if let (Some(x), Some(y)) = (numeric_view(a), numeric_view(b)) {
        return x
            .iter()
            .zip(&y)
            .all(|(p, q)| (p.is_nan() && q.is_nan()) || (p - q).abs() <= epsilon);
    }
    if let (Some(x), Some(y)) = (text_view(a), text_view(b)) {
        return x == y;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_column_fixes_row_count() {
        let mut t = Table::new();
        t.push_column("A", ColumnRole::Asset, ColumnData::Float(vec![1.0, 2.0]))
            .unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.n_cols(), 1);
    }

    #[test]
    fn mismatched_length_is_rejected() {
        let mut t = Table::new();
        t.push_column("A", ColumnRole::Asset, ColumnData::Float(vec![1.0, 2.0]))
            .unwrap();
        let err = t
            .push_column("B", ColumnRole::Asset, ColumnData::Float(vec![1.0]))
            .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                name: "B".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut t = Table::new();
        t.push_column("A", ColumnRole::Asset, ColumnData::Float(vec![1.0]))
            .unwrap();
        let err = t
            .push_column("A", ColumnRole::Derived, ColumnData::Float(vec![2.0]))
            .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("A".into()));
    }

    #[test]
    fn column_order_is_append_order() {
        let mut t = Table::new();
        t.push_column("B", ColumnRole::Asset, ColumnData::Float(vec![1.0]))
            .unwrap();
        t.push_column("A", ColumnRole::Asset, ColumnData::Float(vec![2.0]))
            .unwrap();
        assert_eq!(t.column_names(), vec!["B", "A"]);
    }

    #[test]
    fn values_eq_matches_unknowns_and_coerces_ints() {
        let mut a = Table::new();
        a.push_column("X", ColumnRole::Asset, ColumnData::Float(vec![1.0, f64::NAN]))
            .unwrap();
        a.push_column("Year", ColumnRole::Calendar, ColumnData::Int(vec![2020, 2020]))
            .unwrap();

        let mut b = Table::new();
        b.push_column("X", ColumnRole::Asset, ColumnData::Float(vec![1.0, f64::NAN]))
            .unwrap();
        b.push_column(
            "Year",
            ColumnRole::Asset,
            ColumnData::Float(vec![2020.0, 2020.0]),
        )
        .unwrap();

        assert!(a.values_eq(&b, 0.0));

        let mut c = Table::new();
        c.push_column("X", ColumnRole::Asset, ColumnData::Float(vec![1.0, 2.0]))
            .unwrap();
        c.push_column(
            "Year",
            ColumnRole::Calendar,
            ColumnData::Int(vec![2020, 2020]),
        )
        .unwrap();
        assert!(!a.values_eq(&c, 0.0));
    }

    #[test]
    fn values_eq_matches_dates_against_iso_text() {
        let date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut a = Table::new();
        a.push_column("Date", ColumnRole::Date, ColumnData::Date(vec![date]))
            .unwrap();
        let mut b = Table::new();
        b.push_column(
            "Date",
            ColumnRole::Date,
            ColumnData::Text(vec![Some("2020-01-02".into())]),
        )
        .unwrap();
        assert!(a.values_eq(&b, 0.0));
    }

    #[test]
    fn floats_accessor_is_kind_checked() {
        let mut t = Table::new();
        t.push_column("A", ColumnRole::Asset, ColumnData::Text(vec![None]))
            .unwrap();
        assert!(t.floats("A").is_none());
        assert!(t.floats("missing").is_none());
    }
}
