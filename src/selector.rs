//! Model selection with a degrading fallback chain.
//!
//! The selector picks an entry point from the usable-point count, then
//! walks the chain seasonal decomposition -> seasonal AR -> non-seasonal
//! AR -> linear baseline, advancing one stage per fitter failure. The
//! baseline never fails, so the walk terminates.

use tracing::{info, warn};

use crate::config::ForecastConfig;
use crate::core::IntervalForecast;
use crate::error::{ForecastError, Result};
use crate::models::{
    AutoRegressive, BoxedFitter, LinearTrend, ModelFitter, SeasonalAutoRegressive,
    SeasonalDecomposition,
};

/// Why a selection is forced to LOW confidence.
///
/// Both reasons surface identically to the caller (tier LOW); they are
/// kept distinct so logs can tell sparse history apart from a degraded
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowReason {
    /// Fewer usable points than the AR threshold; the baseline was the
    /// natural entry point.
    SparseHistory,
    /// A richer model was eligible but every attempt failed.
    DegradedFallback,
}

/// Outcome of the model selection walk.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The winning fitter's forecast.
    pub forecast: IntervalForecast,
    /// Identifier of the model that produced the forecast.
    pub model_used: String,
    /// Set when the confidence tier must be forced to LOW.
    pub low_reason: Option<LowReason>,
}

/// Select a model for the usable series and produce its forecast.
pub fn select_and_fit(
    values: &[f64],
    horizon: usize,
    config: &ForecastConfig,
) -> Result<Selection> {
    let usable = values.len();

    let (chain, natural_baseline) = if usable >= config.seasonal_threshold {
        info!(
            usable,
            threshold = config.seasonal_threshold,
            "trying seasonal models"
        );
        (seasonal_chain(config), false)
    } else if usable >= config.ar_threshold {
        info!(usable, threshold = config.ar_threshold, "trying AR model");
        (ar_chain(config), false)
    } else {
        info!(
            usable,
            threshold = config.ar_threshold,
            "sparse history, using baseline directly"
        );
        (baseline_chain(config), true)
    };

    let chain_len = chain.len();
    let (forecast, model_used, attempts) = run_chain(&chain, values, horizon)?;

    let fell_back_to_baseline = !natural_baseline && attempts == chain_len;
    let low_reason = if natural_baseline {
        Some(LowReason::SparseHistory)
    } else if fell_back_to_baseline {
        Some(LowReason::DegradedFallback)
    } else {
        None
    };

    match low_reason {
        Some(LowReason::SparseHistory) => {
            info!(usable, model = %model_used, "confidence forced LOW: sparse history");
        }
        Some(LowReason::DegradedFallback) => {
            warn!(
                usable,
                model = %model_used,
                "confidence forced LOW: model selection degraded to baseline"
            );
        }
        None => {
            info!(model = %model_used, attempts, "model selected");
        }
    }

    let model_used = if low_reason == Some(LowReason::DegradedFallback) {
        format!("{} (Fallback)", model_used)
    } else {
        model_used
    };

    Ok(Selection {
        forecast,
        model_used,
        low_reason,
    })
}

/// Walk a fitter chain until one succeeds.
///
/// Returns the forecast, the winning fitter's name, and how many fitters
/// were attempted (including the winner). Fitter failures are recovered
/// here; only the final fitter's error can propagate, and the chains
/// built above end in the no-failure baseline.
pub(crate) fn run_chain(
    chain: &[BoxedFitter],
    values: &[f64],
    horizon: usize,
) -> Result<(IntervalForecast, String, usize)> {
    let (last, rest) = match chain.split_last() {
        Some(split) => split,
        None => {
            return Err(ForecastError::InvalidParameter(
                "model chain must not be empty".into(),
            ))
        }
    };

    let mut attempts = 0;
    for fitter in rest {
        attempts += 1;
        match fitter.fit(values, horizon) {
            Ok(forecast) => return Ok((forecast, fitter.name().to_string(), attempts)),
            Err(err) => {
                warn!(
                    model = fitter.name(),
                    points = values.len(),
                    error = %err,
                    "fitter failed, falling back"
                );
            }
        }
    }

    attempts += 1;
    let forecast = last.fit(values, horizon)?;
    Ok((forecast, last.name().to_string(), attempts))
}

fn seasonal_chain(config: &ForecastConfig) -> Vec<BoxedFitter> {
    vec![
        Box::new(SeasonalDecomposition {
            period: config.seasonal_period,
            level: config.interval_level,
        }),
        Box::new(SeasonalAutoRegressive {
            period: config.seasonal_period,
            max_order: config.max_ar_order,
            level: config.interval_level,
        }),
        Box::new(AutoRegressive {
            max_order: config.max_ar_order,
            level: config.interval_level,
        }),
        Box::new(LinearTrend {
            interval_multiplier: config.baseline_interval_multiplier,
        }),
    ]
}

fn ar_chain(config: &ForecastConfig) -> Vec<BoxedFitter> {
    vec![
        Box::new(AutoRegressive {
            max_order: config.max_ar_order,
            level: config.interval_level,
        }),
        Box::new(LinearTrend {
            interval_multiplier: config.baseline_interval_multiplier,
        }),
    ]
}

fn baseline_chain(config: &ForecastConfig) -> Vec<BoxedFitter> {
    vec![Box::new(LinearTrend {
        interval_multiplier: config.baseline_interval_multiplier,
    })]
}
