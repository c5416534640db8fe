//! Integration tests for the job runner.
//!
//! Each test runs a full job — provider, pipeline, sink — against a temp
//! directory and checks the persisted output.

use std::collections::BTreeSet;
use std::fs;

use chrono::NaiveDate;
use featurelab_core::{PipelineConfig, RatioPair, SilentObserver};
use featurelab_runner::{
    run_job, CsvSink, DatasetSink, InputConfig, JobConfig, JobError, OutputConfig, OutputFormat,
};

fn small_pipeline_config() -> PipelineConfig {
    PipelineConfig {
        moving_average_windows: BTreeSet::from([2]),
        volatility_window: 2,
        ..PipelineConfig::default()
    }
}

#[test]
fn csv_job_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("raw.csv");
    let output_path = dir.path().join("features.csv");
    fs::write(
        &input_path,
        "Date,Gold,Oil\n\
         2020-01-02,110,5\n\
         2020-01-01,100,4\n\
         2020-01-03,99,\n",
    )
    .unwrap();

    let config = JobConfig {
        input: InputConfig::CsvFile {
            path: input_path.clone(),
        },
        output: OutputConfig {
            path: output_path.clone(),
            format: OutputFormat::Csv,
        },
        pipeline: small_pipeline_config(),
    };

    let report = run_job(&config, &SilentObserver, true).unwrap();

    assert_eq!(report.rows, 3);
    assert!(report.validated);
    assert!(output_path.exists());

    // Spot-check the persisted CSV: sorted dates, derived columns present.
    let text = fs::read_to_string(&output_path).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("Date,Gold,Oil,Year,Month,Quarter"));
    assert!(header.contains("Gold_Return"));
    assert!(header.contains("Gold_MA_2"));
    assert!(header.contains("Gold_Volatility_2d"));
    assert!(header.contains("Gold_Oil_Ratio"));
    let first_row = lines.next().unwrap();
    assert!(first_row.starts_with("2020-01-01,"));
}

#[test]
fn forward_fill_shows_up_in_output() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("raw.csv");
    let output_path = dir.path().join("features.csv");
    // Oil missing on the last day; forward-fill carries 4 forward.
    fs::write(
        &input_path,
        "Date,Gold,Oil\n2020-01-01,100,4\n2020-01-02,110,\n",
    )
    .unwrap();

    let config = JobConfig {
        input: InputConfig::CsvFile { path: input_path },
        output: OutputConfig {
            path: output_path.clone(),
            format: OutputFormat::Csv,
        },
        pipeline: small_pipeline_config(),
    };
    run_job(&config, &SilentObserver, false).unwrap();

    let sink = CsvSink::new(&output_path, "Date");
    let table = sink.read_back().unwrap();
    assert_eq!(table.floats("Oil").unwrap(), &[4.0, 4.0]);
    assert_eq!(table.floats("Gold_Oil_Ratio").unwrap(), &[25.0, 27.5]);
}

#[test]
fn parquet_job_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let config = JobConfig {
        input: InputConfig::Synthetic {
            assets: vec!["Gold".to_string(), "Oil".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        },
        output: OutputConfig {
            path: dir.path().join("features.parquet"),
            format: OutputFormat::Parquet,
        },
        pipeline: PipelineConfig {
            moving_average_windows: BTreeSet::from([7, 30]),
            volatility_window: 30,
            ratio_pairs: vec![RatioPair {
                numerator: "Gold".to_string(),
                denominator: "Oil".to_string(),
            }],
            ..PipelineConfig::default()
        },
    };

    let report = run_job(&config, &SilentObserver, true).unwrap();
    assert!(report.validated);
    assert!(report.columns > 10);
    assert_eq!(
        report.summary.stages.last().unwrap().stage,
        "ratios"
    );
}

#[test]
fn dataset_hash_is_stable_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let make_config = |name: &str| JobConfig {
        input: InputConfig::Synthetic {
            assets: vec!["Gold".to_string()],
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        },
        output: OutputConfig {
            path: dir.path().join(name),
            format: OutputFormat::Csv,
        },
        pipeline: small_pipeline_config(),
    };

    let first = run_job(&make_config("a.csv"), &SilentObserver, false).unwrap();
    let second = run_job(&make_config("b.csv"), &SilentObserver, false).unwrap();
    assert_eq!(first.dataset_hash, second.dataset_hash);
}

#[test]
fn unparseable_dates_fail_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("raw.csv");
    fs::write(&input_path, "Date,Gold\nnot-a-date,100\n").unwrap();

    let config = JobConfig {
        input: InputConfig::CsvFile { path: input_path },
        output: OutputConfig {
            path: dir.path().join("features.csv"),
            format: OutputFormat::Csv,
        },
        pipeline: small_pipeline_config(),
    };

    let err = run_job(&config, &SilentObserver, false).unwrap_err();
    assert!(matches!(err, JobError::Pipeline(_)));
}

#[test]
fn missing_input_file_fails_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let config = JobConfig {
        input: InputConfig::CsvFile {
            path: dir.path().join("does-not-exist.csv"),
        },
        output: OutputConfig {
            path: dir.path().join("features.csv"),
            format: OutputFormat::Csv,
        },
        pipeline: small_pipeline_config(),
    };

    let err = run_job(&config, &SilentObserver, false).unwrap_err();
    assert!(matches!(err, JobError::Data(_)));
}
