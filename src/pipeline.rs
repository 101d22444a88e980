//! The end-to-end forecasting pipeline.
//!
//! Synchronous, single-threaded, and stateless between invocations: every
//! call builds its series fresh from the caller's records, and nothing is
//! cached or shared, so concurrent calls on independent inputs cannot
//! interfere.

use tracing::{error, info, warn};

use crate::assemble::assemble;
use crate::backtest::{min_train_size, rolling_origin_backtest};
use crate::config::ForecastConfig;
use crate::core::{AccuracyReport, ConfidenceTier, ForecastResult, RawRecord};
use crate::detection::detect_and_cap;
use crate::error::{ForecastError, Result};
use crate::prepare::prepare_weekly_series;
use crate::selector::select_and_fit;

/// Generate a weekly forecast from raw transaction records.
///
/// Never propagates an error past its boundary: on unrecoverable failure
/// (fewer than four aggregated weeks, or a non-positive horizon) it
/// returns the safe all-empty result with LOW confidence. Recoverable
/// failures degrade gracefully inside the pipeline.
pub fn forecast_weekly(
    records: &[RawRecord],
    horizon: usize,
    config: &ForecastConfig,
) -> ForecastResult {
    info!(records = records.len(), horizon, "starting forecast generation");

    match run(records, horizon, config) {
        Ok(result) => {
            info!(
                model = %result.model_used,
                total = result.total_forecast,
                confidence = result.accuracy.confidence.as_str(),
                "forecast generation complete"
            );
            result
        }
        Err(err) => {
            error!(error = %err, "forecast generation failed, returning safe fallback");
            ForecastResult::safe_fallback()
        }
    }
}

fn run(records: &[RawRecord], horizon: usize, config: &ForecastConfig) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "horizon must be a positive number of weeks".into(),
        ));
    }

    let prepared = prepare_weekly_series(records, config.negative_policy)?;
    let cleaned = detect_and_cap(&prepared.series, &config.anomaly);

    let usable = cleaned.series.nonzero_values();
    info!(
        weeks = cleaned.series.len(),
        usable = usable.len(),
        anomalies = cleaned.anomalies.len(),
        sparsity_pct = prepared.sparsity * 100.0,
        "series prepared for modeling"
    );

    let selection = select_and_fit(&usable, horizon, config)?;

    let accuracy = match rolling_origin_backtest(
        &usable,
        horizon,
        min_train_size(usable.len()),
        config,
    ) {
        Ok(metrics) => {
            // A forced-LOW selection overrides whatever the backtest says.
            let confidence = if selection.low_reason.is_some() {
                ConfidenceTier::Low
            } else {
                metrics.confidence
            };
            AccuracyReport {
                mape: Some(metrics.mape),
                rmse: Some(metrics.rmse),
                r2: Some(metrics.r2),
                accuracy: metrics.accuracy,
                confidence,
            }
        }
        Err(err) => {
            warn!(error = %err, "backtest skipped, reporting null accuracy");
            AccuracyReport::unavailable(ConfidenceTier::Low)
        }
    };

    assemble(
        &cleaned.series,
        &selection.forecast,
        accuracy,
        selection.model_used,
        config,
    )
}
