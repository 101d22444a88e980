//! Utility functions shared across the pipeline.

pub mod metrics;
pub mod stats;

pub use metrics::{calculate_metrics, BacktestMetrics};
pub use stats::quantile_normal;
