//! FeatureLab Runner — job orchestration around the core pipeline.
//!
//! This crate builds on `featurelab-core` to provide:
//! - Dataset providers: local CSV, HTTP CSV, deterministic synthetic data
//! - Dataset sinks: CSV and Parquet, both supporting round-trip read-back
//! - TOML job configuration (input + output + pipeline sections)
//! - The job runner: provider → pipeline → sink, with a BLAKE3 dataset
//!   hash and optional round-trip validation

pub mod config;
pub mod http;
pub mod job;
pub mod provider;
pub mod sink;
pub mod synthetic;

pub use config::{InputConfig, JobConfig, JobConfigError, OutputConfig, OutputFormat};
pub use http::HttpCsvProvider;
pub use job::{build_provider, build_sink, dataset_hash, run_job, JobError, JobReport};
pub use provider::{CsvFileProvider, DataError, DatasetProvider, DatasetSource, RawDataset};
pub use sink::{CsvSink, DatasetSink, ParquetSink, SinkError};
pub use synthetic::{generate_dataset, SyntheticProvider};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<JobConfig>();
        assert_sync::<JobConfig>();
        assert_send::<OutputFormat>();
        assert_sync::<OutputFormat>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<JobReport>();
        assert_sync::<JobReport>();
    }

    #[test]
    fn providers_and_sinks_are_send_sync() {
        assert_send::<CsvFileProvider>();
        assert_sync::<CsvFileProvider>();
        assert_send::<SyntheticProvider>();
        assert_sync::<SyntheticProvider>();
        assert_send::<CsvSink>();
        assert_sync::<CsvSink>();
        assert_send::<ParquetSink>();
        assert_sync::<ParquetSink>();
    }
}
