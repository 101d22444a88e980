//! Core data structures: weekly series and forecast results.

mod forecast;
mod series;

pub use forecast::{
    AccuracyReport, ConfidenceTier, ForecastEntry, ForecastResult, HistoricalEntry,
    IntervalForecast,
};
pub use series::{CleanedSeries, RawRecord, WeeklySeries};
