//! Forecast output structures and the result contract.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Point forecasts with prediction interval bounds, one entry per step.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalForecast {
    /// Point estimates.
    pub point: Vec<f64>,
    /// Lower interval bounds.
    pub lower: Vec<f64>,
    /// Upper interval bounds.
    pub upper: Vec<f64>,
}

impl IntervalForecast {
    /// Create a forecast, validating that all three series share a length.
    pub fn new(point: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if point.len() != lower.len() || point.len() != upper.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "interval forecast lengths differ: point={}, lower={}, upper={}",
                point.len(),
                lower.len(),
                upper.len()
            )));
        }
        Ok(Self {
            point,
            lower,
            upper,
        })
    }

    /// Forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Clamp all values to be non-negative and restore bound ordering.
    ///
    /// After clamping, `lower <= point <= upper` holds at every step.
    pub fn clamp_non_negative(&mut self) {
        for i in 0..self.point.len() {
            self.point[i] = self.point[i].max(0.0);
            self.lower[i] = self.lower[i].max(0.0).min(self.point[i]);
            self.upper[i] = self.upper[i].max(0.0).max(self.point[i]);
        }
    }
}

/// Coarse confidence tier derived from backtest MAPE, or forced to LOW
/// under data scarcity or fallback degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "HIGH",
            ConfidenceTier::Medium => "MEDIUM",
            ConfidenceTier::Low => "LOW",
        }
    }
}

/// Accuracy metrics reported to the caller.
///
/// Null metric fields indicate backtesting was not possible; the tier is
/// then LOW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Mean absolute percentage error, percent.
    pub mape: Option<f64>,
    /// Root mean squared error.
    pub rmse: Option<f64>,
    /// Coefficient of determination.
    pub r2: Option<f64>,
    /// `max(0, 100 - MAPE)`, or 0 when backtesting was skipped.
    pub accuracy: f64,
    /// Confidence tier.
    pub confidence: ConfidenceTier,
}

impl AccuracyReport {
    /// Report for when backtesting was infeasible.
    pub fn unavailable(confidence: ConfidenceTier) -> Self {
        Self {
            mape: None,
            rmse: None,
            r2: None,
            accuracy: 0.0,
            confidence,
        }
    }
}

/// One week of historical context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// Week label, e.g. `"20 Dec"`.
    pub date: String,
    /// Aggregated sales for that week.
    pub sales: f64,
}

/// One forecast step, including the connector point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Week label, e.g. `"27 Dec"`.
    pub week: String,
    /// Point estimate.
    pub sales: f64,
    /// Lower interval bound.
    pub lower: f64,
    /// Upper interval bound.
    pub upper: f64,
}

/// The complete forecast result returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Last eight non-zero historical weeks.
    pub historical: Vec<HistoricalEntry>,
    /// Connector point followed by `horizon` forecast steps.
    pub forecast: Vec<ForecastEntry>,
    /// Sum of forecast point estimates, connector included.
    #[serde(rename = "totalForecast")]
    pub total_forecast: f64,
    /// Backtest accuracy and confidence tier.
    pub accuracy: AccuracyReport,
    /// Identifier of the model that produced the forecast.
    pub model_used: String,
}

impl ForecastResult {
    /// The safe all-empty result used when the pipeline cannot forecast.
    pub fn safe_fallback() -> Self {
        Self {
            historical: Vec::new(),
            forecast: Vec::new(),
            total_forecast: 0.0,
            accuracy: AccuracyReport::unavailable(ConfidenceTier::Low),
            model_used: "none".to_string(),
        }
    }
}
