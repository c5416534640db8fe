//! Progress reporting for pipeline runs.
//!
//! The observer is injected so the pipeline itself stays a pure function of
//! (table, configuration). CLI callers use `StdoutObserver`; tests and
//! library embedders use `SilentObserver`.

use serde::{Deserialize, Serialize};

/// Shape and per-stage column deltas of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineSummary {
    /// Final row count.
    pub rows: usize,
    /// Final column count.
    pub columns: usize,
    /// One entry per stage, in execution order.
    pub stages: Vec<StageReport>,
}

/// What a single stage did to the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageReport {
    pub stage: String,
    pub columns_added: usize,
}

/// Progress callback for pipeline runs.
pub trait PipelineObserver: Send {
    /// Called before a stage runs.
    fn on_stage_start(&self, stage: &str, index: usize, total: usize);

    /// Called after a stage completes, with the new table shape.
    fn on_stage_complete(&self, stage: &str, index: usize, total: usize, rows: usize, cols: usize);

    /// Called once after the last stage.
    fn on_pipeline_complete(&self, summary: &PipelineSummary);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutObserver;

impl PipelineObserver for StdoutObserver {
    fn on_stage_start(&self, stage: &str, index: usize, total: usize) {
        println!("[{}/{}] Running {stage}...", index + 1, total);
    }

    fn on_stage_complete(
        &self,
        stage: &str,
        _index: usize,
        _total: usize,
        rows: usize,
        cols: usize,
    ) {
        println!("  OK: {stage} ({rows} rows, {cols} columns)");
    }

    fn on_pipeline_complete(&self, summary: &PipelineSummary) {
        println!(
            "\nPipeline complete: {} rows, {} columns",
            summary.rows, summary.columns
        );
    }
}

/// Observer that reports nothing.
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {
    fn on_stage_start(&self, _stage: &str, _index: usize, _total: usize) {}

    fn on_stage_complete(
        &self,
        _stage: &str,
        _index: usize,
        _total: usize,
        _rows: usize,
        _cols: usize,
    ) {
    }

    fn on_pipeline_complete(&self, _summary: &PipelineSummary) {}
}
