//! Pipeline configuration.

use crate::detection::AnomalyConfig;
use crate::prepare::NegativePolicy;

/// Configuration for the forecasting pipeline.
///
/// The defaults reproduce the production behavior: seasonal models from a
/// year of weekly data, AR from 16 weeks, baseline below that, and a
/// December 18-31 uplift of 1.15.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// How negative amounts are folded into the weekly aggregate.
    pub negative_policy: NegativePolicy,
    /// Anomaly detection settings.
    pub anomaly: AnomalyConfig,
    /// Usable points needed to attempt seasonal models.
    pub seasonal_threshold: usize,
    /// Usable points needed to attempt the non-seasonal AR model.
    pub ar_threshold: usize,
    /// Seasonal period in weeks for the seasonal fitters.
    pub seasonal_period: usize,
    /// Highest AR order considered.
    pub max_ar_order: usize,
    /// Interval coverage level for the AR-family fitters.
    pub interval_level: f64,
    /// Baseline interval width in historical standard deviations.
    pub baseline_interval_multiplier: f64,
    /// MAPE below this is HIGH confidence.
    pub high_mape_cutoff: f64,
    /// MAPE below this (and above the HIGH cutoff) is MEDIUM confidence.
    pub medium_mape_cutoff: f64,
    /// Rolling-origin step between backtest windows, in weeks.
    pub backtest_step: usize,
    /// Minimum feasible windows for backtesting.
    pub min_backtest_windows: usize,
    /// Window cap for bounded backtest cost.
    pub max_backtest_windows: usize,
    /// Multiplier applied to forecast weeks falling on December 18-31.
    pub december_uplift: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            negative_policy: NegativePolicy::KeepSigned,
            anomaly: AnomalyConfig::default(),
            seasonal_threshold: 52,
            ar_threshold: 16,
            seasonal_period: 52,
            max_ar_order: 3,
            interval_level: 0.85,
            baseline_interval_multiplier: 1.5,
            high_mape_cutoff: 15.0,
            medium_mape_cutoff: 30.0,
            backtest_step: 1,
            min_backtest_windows: 2,
            max_backtest_windows: 8,
            december_uplift: 1.15,
        }
    }
}

impl ForecastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the negative-amount policy.
    pub fn with_negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.negative_policy = policy;
        self
    }

    /// Set the anomaly detection settings.
    pub fn with_anomaly(mut self, anomaly: AnomalyConfig) -> Self {
        self.anomaly = anomaly;
        self
    }

    /// Set the December uplift multiplier.
    pub fn with_december_uplift(mut self, uplift: f64) -> Self {
        self.december_uplift = uplift;
        self
    }
}
