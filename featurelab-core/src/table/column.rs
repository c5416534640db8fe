//! Column storage and role tags.
//!
//! A column's storage kind is decided once when the table is constructed
//! (text vs float vs date vs int) and never re-inferred by stages. The
//! unknown marker for float columns is `f64::NAN`; for text columns it is
//! `None`.

use chrono::NaiveDate;

/// What a column holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Raw text values from the provider. `None` is a missing cell.
    Text(Vec<Option<String>>),
    /// Parsed calendar dates (the date column after cleaning).
    Date(Vec<NaiveDate>),
    /// Numeric values. `f64::NAN` is the unknown marker.
    Float(Vec<f64>),
    /// Integer attributes (calendar features).
    Int(Vec<i32>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Storage kind name, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColumnData::Text(_) => "text",
            ColumnData::Date(_) => "date",
            ColumnData::Float(_) => "float",
            ColumnData::Int(_) => "int",
        }
    }

    /// Reorder rows by the given index permutation.
    ///
    /// `order[k]` is the source row that lands at output row k. Callers are
    /// responsible for passing a true permutation of `0..len`.
    pub fn gather(&self, order: &[usize]) -> ColumnData {
        match self {
            ColumnData::Text(v) => {
                ColumnData::Text(order.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnData::Date(v) => ColumnData::Date(order.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(order.iter().map(|&i| v[i]).collect()),
            ColumnData::Int(v) => ColumnData::Int(order.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// How a column participates in stage scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// The single required date column.
    Date,
    /// User-supplied instrument column. Candidate for returns and moving
    /// averages when it holds floats.
    Asset,
    /// Calendar attribute added by the calendar stage.
    Calendar,
    /// Column added by a derivation stage. Never a candidate again.
    Derived,
}

/// A named, role-tagged column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub role: ColumnRole,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, role: ColumnRole, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            role,
            data,
        }
    }

    /// The float values, if this column holds floats.
    pub fn floats(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float(v) => Some(v),
            _ => None,
        }
    }

    /// The dates, if this column holds parsed dates.
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        match &self.data {
            ColumnData::Date(v) => Some(v),
            _ => None,
        }
    }
}
