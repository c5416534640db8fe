//! FeatureLab CLI — run feature-engineering jobs from the command line.
//!
//! Commands:
//! - `run` — execute a job from a TOML config file or ad-hoc flags
//! - `sample` — write a deterministic synthetic dataset CSV for testing

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use featurelab_core::{PipelineConfig, SilentObserver, StdoutObserver};
use featurelab_runner::{
    generate_dataset, run_job, CsvSink, DatasetSink, InputConfig, JobConfig, OutputConfig,
    OutputFormat,
};

#[derive(Parser)]
#[command(
    name = "featurelab",
    about = "FeatureLab CLI — financial feature-engineering pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a job from a TOML config file or ad-hoc flags.
    Run {
        /// Path to a TOML job config. Mutually exclusive with --input/--url.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Input CSV file.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Input CSV URL (downloaded over HTTP).
        #[arg(long)]
        url: Option<String>,

        /// Output path. Defaults to features.csv.
        #[arg(long, default_value = "features.csv")]
        output: PathBuf,

        /// Output format: csv or parquet.
        #[arg(long, default_value = "csv")]
        format: String,

        /// Name of the date column.
        #[arg(long, default_value = "Date")]
        date_column: String,

        /// Re-read the output after writing and verify the round trip.
        #[arg(long, default_value_t = false)]
        validate: bool,

        /// Suppress per-stage progress output.
        #[arg(long, default_value_t = false)]
        quiet: bool,

        /// Print the full job report as JSON instead of a summary line.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a deterministic synthetic dataset CSV.
    Sample {
        /// Asset column names (e.g., Gold Oil "S&P 500").
        #[arg(required = true)]
        assets: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 5 years before the end date.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Output CSV path.
        #[arg(long, default_value = "sample.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            input,
            url,
            output,
            format,
            date_column,
            validate,
            quiet,
            json,
        } => cmd_run(
            config, input, url, output, &format, date_column, validate, quiet, json,
        ),
        Commands::Sample {
            assets,
            start,
            end,
            output,
        } => cmd_sample(&assets, start.as_deref(), end.as_deref(), output),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    url: Option<String>,
    output: PathBuf,
    format: &str,
    date_column: String,
    validate: bool,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let job = match (config, input, url) {
        (Some(path), None, None) => JobConfig::from_toml_path(&path)
            .with_context(|| format!("loading job config from {}", path.display()))?,
        (None, Some(path), None) => JobConfig {
            input: InputConfig::CsvFile { path },
            output: output_config(output, format)?,
            pipeline: pipeline_with_date_column(date_column),
        },
        (None, None, Some(url)) => JobConfig {
            input: InputConfig::Http { url },
            output: output_config(output, format)?,
            pipeline: pipeline_with_date_column(date_column),
        },
        (None, None, None) => bail!("one of --config, --input, or --url is required"),
        _ => bail!("--config, --input, and --url are mutually exclusive"),
    };

    let report = if quiet {
        run_job(&job, &SilentObserver, validate)?
    } else {
        run_job(&job, &StdoutObserver, validate)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Wrote {} rows x {} columns to {} (source: {:?}, hash: {})",
            report.rows,
            report.columns,
            report.output_path.display(),
            report.source,
            &report.dataset_hash[..16],
        );
        if report.validated {
            println!("Round-trip validation passed");
        }
    }
    Ok(())
}

fn cmd_sample(
    assets: &[String],
    start: Option<&str>,
    end: Option<&str>,
    output: PathBuf,
) -> Result<()> {
    let end = match end {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let start = match start {
        Some(raw) => parse_date(raw)?,
        None => end - chrono::Duration::days(365 * 5),
    };
    if start > end {
        bail!("start date {start} is after end date {end}");
    }

    let names: Vec<&str> = assets.iter().map(String::as_str).collect();
    let table = generate_dataset(&names, start, end);
    let sink = CsvSink::new(&output, "Date");
    sink.write(&table)
        .with_context(|| format!("writing sample dataset to {}", output.display()))?;

    println!(
        "Wrote {} rows x {} columns to {}",
        table.n_rows(),
        table.n_cols(),
        output.display()
    );
    Ok(())
}

fn output_config(path: PathBuf, format: &str) -> Result<OutputConfig> {
    let format = match format.to_ascii_lowercase().as_str() {
        "csv" => OutputFormat::Csv,
        "parquet" => OutputFormat::Parquet,
        other => bail!("unknown output format '{other}' (expected csv or parquet)"),
    };
    Ok(OutputConfig { path, format })
}

fn pipeline_with_date_column(date_column: String) -> PipelineConfig {
    PipelineConfig {
        date_column,
        ..PipelineConfig::default()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))
}
