//! Deterministic synthetic datasets for development and testing.
//!
//! Produces a wide table shaped like a provider CSV: a raw text date
//! column over weekdays plus one random-walk float column per asset. Each
//! asset's walk is seeded from a BLAKE3 hash of its name, so the same
//! request always yields the same data. A small fraction of cells is left
//! missing so the cleaner's forward-fill has something to do.

use chrono::{Datelike, NaiveDate, Weekday};
use featurelab_core::{ColumnData, ColumnRole, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::provider::{DataError, DatasetProvider, DatasetSource, RawDataset};

/// Fraction of cells left missing, per asset.
const GAP_RATE: f64 = 0.02;

/// Generate a synthetic wide table over the weekdays in `[start, end]`.
pub fn generate_dataset(assets: &[&str], start: NaiveDate, end: NaiveDate) -> Table {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        let weekday = current.weekday();
        if weekday != Weekday::Sat && weekday != Weekday::Sun {
            dates.push(current);
        }
        current += chrono::Duration::days(1);
    }

    let mut table = Table::new();
    // Raw text dates: this table stands in for provider output, which the
    // cleaner has not parsed yet.
    table
        .push_column(
            "Date",
            ColumnRole::Date,
            ColumnData::Text(dates.iter().map(|d| Some(d.to_string())).collect()),
        )
        .expect("fresh table accepts the date column");

    for asset in assets {
        let seed: [u8; 32] = *blake3::hash(asset.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut price = 100.0_f64;
        let values: Vec<f64> = dates
            .iter()
            .map(|_| {
                let daily_return: f64 = rng.gen_range(-0.03..0.03);
                price *= 1.0 + daily_return;
                if rng.gen_bool(GAP_RATE) {
                    f64::NAN
                } else {
                    price
                }
            })
            .collect();

        table
            .push_column(*asset, ColumnRole::Asset, ColumnData::Float(values))
            .expect("generated column matches table length");
    }

    table
}

/// Provider wrapper around `generate_dataset`.
pub struct SyntheticProvider {
    assets: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl SyntheticProvider {
    pub fn new(assets: Vec<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self { assets, start, end }
    }
}

impl DatasetProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self) -> Result<RawDataset, DataError> {
        let assets: Vec<&str> = self.assets.iter().map(String::as_str).collect();
        let table = generate_dataset(&assets, self.start, self.end);
        Ok(RawDataset {
            table,
            source: DatasetSource::Synthetic,
            origin: format!(
                "synthetic {} {}..{}",
                self.assets.join(","),
                self.start,
                self.end
            ),
        })
    }
}
