//! The orchestrator: six stages in fixed order.
//!
//! The order is load-bearing — volatility reads the return columns, ratios
//! and moving averages read cleaned levels, calendar needs parsed dates.
//! The pipeline fails fast on the first stage error; there are no partial
//! pipelines.

use thiserror::Error;

use crate::config::{ConfigError, PipelineConfig};
use crate::observer::{PipelineObserver, PipelineSummary, StageReport};
use crate::stages::{
    CalendarFeaturizer, Cleaner, MovingAverageCalculator, RatioCalculator, ReturnCalculator,
    Stage, StageError, VolatilityCalculator,
};
use crate::table::Table;

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        source: StageError,
    },
}

/// Output of a successful run: the enriched table and its summary.
#[derive(Debug)]
pub struct PipelineRun {
    pub table: Table,
    pub summary: PipelineSummary,
}

/// The feature pipeline, fully determined by its configuration.
pub struct FeaturePipeline {
    config: PipelineConfig,
    stages: Vec<Box<dyn Stage>>,
}

impl FeaturePipeline {
    /// Build a pipeline, validating the configuration up front.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(Cleaner::new(&config.date_column)),
            Box::new(CalendarFeaturizer::new(&config.date_column)),
            Box::new(ReturnCalculator::new()),
            Box::new(MovingAverageCalculator::new(
                config.moving_average_windows.iter().copied(),
            )),
            Box::new(VolatilityCalculator::new(config.volatility_window)),
            Box::new(RatioCalculator::new(config.ratio_pairs.clone())),
        ];
        Ok(Self { config, stages })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage in order, reporting progress to the observer.
    pub fn run(
        &self,
        table: Table,
        observer: &dyn PipelineObserver,
    ) -> Result<PipelineRun, PipelineError> {
        let total = self.stages.len();
        let mut current = table;
        let mut reports = Vec::with_capacity(total);

        for (index, stage) in self.stages.iter().enumerate() {
            observer.on_stage_start(stage.name(), index, total);
            let before = current.n_cols();
            let next = stage.apply(&current).map_err(|source| PipelineError::Stage {
                stage: stage.name(),
                source,
            })?;
            observer.on_stage_complete(stage.name(), index, total, next.n_rows(), next.n_cols());
            reports.push(StageReport {
                stage: stage.name().to_string(),
                columns_added: next.n_cols() - before,
            });
            current = next;
        }

        let summary = PipelineSummary {
            rows: current.n_rows(),
            columns: current.n_cols(),
            stages: reports,
        };
        observer.on_pipeline_complete(&summary);

        Ok(PipelineRun {
            table: current,
            summary,
        })
    }
}
