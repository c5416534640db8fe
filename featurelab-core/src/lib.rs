//! FeatureLab Core — table model, transformation stages, and the pipeline.
//!
//! This crate contains the heart of the feature engine:
//! - Role-tagged column table with an explicit unknown marker
//! - Six pure stages: cleaner, calendar features, returns, moving
//!   averages, rolling volatility, cross-asset ratios
//! - Fixed-order orchestrator with an injectable progress observer
//! - Serializable pipeline configuration
//!
//! No I/O lives here: providers hand a `Table` in, sinks take one out.

pub mod config;
pub mod observer;
pub mod pipeline;
pub mod rolling;
pub mod stages;
pub mod table;

pub use config::{ConfigError, PipelineConfig, RatioPair};
pub use observer::{PipelineObserver, PipelineSummary, SilentObserver, StageReport, StdoutObserver};
pub use pipeline::{FeaturePipeline, PipelineError, PipelineRun};
pub use stages::{
    CalendarFeaturizer, Cleaner, MovingAverageCalculator, RatioCalculator, ReturnCalculator,
    Stage, StageError, VolatilityCalculator,
};
pub use table::{Column, ColumnData, ColumnRole, Table, TableError};
