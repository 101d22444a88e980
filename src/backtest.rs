//! Rolling-origin backtesting for out-of-sample accuracy estimation.
//!
//! The backtest always proxies with the baseline linear-trend model, not
//! the model chosen for the live forecast. The reported metrics therefore
//! reflect the baseline's historical generalization; this is a deliberate,
//! bounded-cost simplification, not a bug.

use tracing::{info, warn};

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::{LinearTrend, ModelFitter};
use crate::utils::metrics::{calculate_metrics, BacktestMetrics};

/// Minimum training window for the rolling origin: at least 8 weeks or
/// half the usable data.
pub fn min_train_size(usable: usize) -> usize {
    8.max(usable / 2)
}

/// Run a rolling-origin backtest over the usable series.
///
/// Splits the series at `min_train + i * step` for each feasible window
/// (capped for bounded cost), fits the baseline on the training prefix,
/// and pools predicted/actual pairs across windows into one set of
/// metrics.
///
/// Fails with [`ForecastError::BacktestInfeasible`] when fewer than the
/// configured minimum number of windows fit.
pub fn rolling_origin_backtest(
    values: &[f64],
    horizon: usize,
    min_train: usize,
    config: &ForecastConfig,
) -> Result<BacktestMetrics> {
    let n = values.len();
    let needed = config.min_backtest_windows;

    if n < min_train + horizon {
        warn!(
            len = n,
            required = min_train + horizon,
            "insufficient data for backtesting"
        );
        return Err(ForecastError::BacktestInfeasible { windows: 0, needed });
    }

    let step = config.backtest_step.max(1);
    let max_windows = (n - min_train) / step;
    let num_windows = max_windows.min(config.max_backtest_windows);

    if num_windows < needed {
        warn!(
            windows = num_windows,
            needed, "not enough windows for backtesting"
        );
        return Err(ForecastError::BacktestInfeasible {
            windows: num_windows,
            needed,
        });
    }

    info!(windows = num_windows, horizon, min_train, "running rolling-origin backtest");

    let baseline = LinearTrend {
        interval_multiplier: config.baseline_interval_multiplier,
    };
    let mut actuals = Vec::new();
    let mut predictions = Vec::new();

    for i in 0..num_windows {
        let split = min_train + i * step;
        if split + horizon > n {
            break;
        }
        let train = &values[..split];
        let test = &values[split..split + horizon];

        let forecast = baseline.fit(train, horizon)?;
        actuals.extend_from_slice(test);
        predictions.extend_from_slice(&forecast.point);
    }

    if actuals.is_empty() {
        return Err(ForecastError::BacktestInfeasible { windows: 0, needed });
    }

    let metrics = calculate_metrics(
        &actuals,
        &predictions,
        config.high_mape_cutoff,
        config.medium_mape_cutoff,
    )?;

    info!(
        mape = metrics.mape,
        rmse = metrics.rmse,
        confidence = metrics.confidence.as_str(),
        "backtest complete"
    );

    Ok(metrics)
}
