//! HTTP CSV provider.
//!
//! Fetches a CSV dataset from a URL with a blocking client. Retry/backoff
//! and credentials are out of scope; a non-success status is surfaced as a
//! plain error.

use std::time::Duration;

use crate::provider::{decode_csv, DataError, DatasetProvider, DatasetSource, RawDataset};

pub struct HttpCsvProvider {
    url: String,
    date_column: String,
    client: reqwest::blocking::Client,
}

impl HttpCsvProvider {
    pub fn new(url: impl Into<String>, date_column: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("featurelab/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self {
            url: url.into(),
            date_column: date_column.into(),
            client,
        }
    }
}

impl DatasetProvider for HttpCsvProvider {
    fn name(&self) -> &str {
        "http-csv"
    }

    fn fetch(&self) -> Result<RawDataset, DataError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http(format!(
                "{} returned status {status}",
                self.url
            )));
        }

        let text = response
            .text()
            .map_err(|e| DataError::Http(e.to_string()))?;
        let table = decode_csv(&text, &self.date_column)?;

        Ok(RawDataset {
            table,
            source: DatasetSource::Http,
            origin: self.url.clone(),
        })
    }
}
