//! Error types for the sales-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during forecasting operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Fewer aggregated periods than the pipeline can work with.
    ///
    /// Fatal to the invocation; the pipeline surfaces it as the safe
    /// all-empty result instead of propagating.
    #[error("insufficient data: need at least {needed} weeks, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// An individual model fitter failed.
    ///
    /// Always recovered by the selector's fallback chain, never surfaced
    /// to the caller.
    #[error("model fit failed ({model}): {reason}")]
    ModelFit { model: &'static str, reason: String },

    /// Not enough rolling windows to backtest.
    ///
    /// Recovered by reporting null accuracy fields with LOW confidence.
    #[error("backtest infeasible: {windows} windows available, need {needed}")]
    BacktestInfeasible { windows: usize, needed: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Weekly cadence violation in a series.
    #[error("cadence error: {0}")]
    Cadence(String),
}
