//! Accuracy metrics for backtest evaluation.

use crate::core::ConfidenceTier;
use crate::error::{ForecastError, Result};
use crate::utils::stats::{mean, round2, round3};

/// Substituted for exactly-zero actuals so MAPE stays finite.
const ZERO_ACTUAL_EPSILON: f64 = 1e-10;

/// Pooled accuracy metrics over a set of predicted/actual pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestMetrics {
    /// Mean absolute percentage error, percent.
    pub mape: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Coefficient of determination (0 when the actuals are constant).
    pub r2: f64,
    /// `max(0, 100 - MAPE)`.
    pub accuracy: f64,
    /// Tier derived from the MAPE cutoffs.
    pub confidence: ConfidenceTier,
}

/// Calculate pooled accuracy metrics between actual and predicted values.
///
/// MAPE uses a small epsilon in place of exactly-zero actuals to avoid
/// division by zero. The confidence tier is HIGH below `high_mape_cutoff`,
/// MEDIUM below `medium_mape_cutoff`, LOW otherwise.
pub fn calculate_metrics(
    actual: &[f64],
    predicted: &[f64],
    high_mape_cutoff: f64,
    medium_mape_cutoff: f64,
) -> Result<BacktestMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "actual has {} points but predicted has {}",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;

    let mape: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| {
            let denom = if *a == 0.0 { ZERO_ACTUAL_EPSILON } else { *a };
            ((a - p) / denom).abs()
        })
        .sum::<f64>()
        / n
        * 100.0;

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let rmse = mse.sqrt();

    let mean_actual = mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        0.0
    };

    let accuracy = (100.0 - mape).max(0.0);

    let confidence = if mape < high_mape_cutoff {
        ConfidenceTier::High
    } else if mape < medium_mape_cutoff {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    };

    Ok(BacktestMetrics {
        mape: round2(mape),
        rmse: round2(rmse),
        r2: round3(r2),
        accuracy: round2(accuracy),
        confidence,
    })
}
