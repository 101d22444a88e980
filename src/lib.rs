//! # sales-forecast
//!
//! Weekly sales forecasting from raw transaction records.
//!
//! The pipeline aggregates dated amounts into a Sunday-ending weekly
//! series, caps anomalies, selects a model by history length with a
//! degrading fallback chain (seasonal decomposition, seasonal AR,
//! non-seasonal AR, linear baseline), estimates out-of-sample accuracy
//! with a rolling-origin backtest, and assembles a chart-ready result
//! with prediction intervals, a December uplift, and a confidence tier.
//!
//! ## Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use sales_forecast::prelude::*;
//!
//! let records: Vec<RawRecord> = (0..20)
//!     .map(|i| {
//!         let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
//!             + chrono::Duration::weeks(i);
//!         RawRecord::new(date, 100.0 + 5.0 * i as f64)
//!     })
//!     .collect();
//!
//! let result = forecast_weekly(&records, 4, &ForecastConfig::default());
//! assert_eq!(result.forecast.len(), 5); // connector + 4 forecast weeks
//! ```

pub mod assemble;
pub mod backtest;
pub mod config;
pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prepare;
pub mod selector;
pub mod utils;

pub use error::{ForecastError, Result};

/// Commonly used types and the pipeline entry point.
pub mod prelude {
    pub use crate::config::ForecastConfig;
    pub use crate::core::{
        AccuracyReport, ConfidenceTier, ForecastEntry, ForecastResult, HistoricalEntry,
        IntervalForecast, RawRecord, WeeklySeries,
    };
    pub use crate::detection::{AnomalyConfig, AnomalyMethod};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::ModelFitter;
    pub use crate::pipeline::forecast_weekly;
    pub use crate::prepare::NegativePolicy;
}
