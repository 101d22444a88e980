//! Auto-selected autoregressive model.
//!
//! Fits AR(p) by conditional least squares for p = 1..=max_order and keeps
//! the order with the lowest AIC. Used directly as the non-seasonal fitter
//! and by the seasonal variant on a seasonally differenced series.

use crate::core::IntervalForecast;
use crate::error::{ForecastError, Result};
use crate::models::ModelFitter;
use crate::utils::stats::quantile_normal;

/// Forecasts beyond this multiple of the historical magnitude are treated
/// as numerical blow-up.
const EXPLOSION_FACTOR: f64 = 1e6;

/// Auto-selected AR(p) fitter.
#[derive(Debug, Clone)]
pub struct AutoRegressive {
    /// Highest AR order considered.
    pub max_order: usize,
    /// Interval coverage level in (0, 1).
    pub level: f64,
}

impl Default for AutoRegressive {
    fn default() -> Self {
        Self {
            max_order: 3,
            level: 0.85,
        }
    }
}

impl AutoRegressive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelFitter for AutoRegressive {
    fn fit(&self, values: &[f64], horizon: usize) -> Result<IntervalForecast> {
        let fit = select_ar(values, self.max_order, "AR")?;
        let point = fit.forecast(values, horizon, "AR")?;

        let z = quantile_normal((1.0 + self.level) / 2.0);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, estimate) in point.iter().enumerate() {
            let se = fit.sigma * ((h + 1) as f64).sqrt();
            lower.push(estimate - z * se);
            upper.push(estimate + z * se);
        }

        let mut forecast = IntervalForecast::new(point, lower, upper)?;
        forecast.clamp_non_negative();
        Ok(forecast)
    }

    fn name(&self) -> &'static str {
        "AR"
    }
}

/// A fitted AR(p) model.
#[derive(Debug, Clone)]
pub(crate) struct ArFit {
    /// Selected order.
    pub order: usize,
    /// Intercept term.
    pub intercept: f64,
    /// AR coefficients, lag 1 first.
    pub coeffs: Vec<f64>,
    /// Residual standard deviation.
    pub sigma: f64,
}

impl ArFit {
    /// Forecast `horizon` steps past the end of `history`.
    ///
    /// Fails if the recursion produces non-finite or explosive values.
    pub(crate) fn forecast(
        &self,
        history: &[f64],
        horizon: usize,
        model: &'static str,
    ) -> Result<Vec<f64>> {
        let magnitude = history.iter().fold(0.0f64, |acc, v| acc.max(v.abs())) + 1.0;
        let mut extended = history.to_vec();
        let mut point = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let mut estimate = self.intercept;
            for (lag, coeff) in self.coeffs.iter().enumerate() {
                estimate += coeff * extended[extended.len() - 1 - lag];
            }
            if !estimate.is_finite() || estimate.abs() > EXPLOSION_FACTOR * magnitude {
                return Err(ForecastError::ModelFit {
                    model,
                    reason: format!("explosive forecast at order {}", self.order),
                });
            }
            extended.push(estimate);
            point.push(estimate);
        }

        Ok(point)
    }
}

/// Fit AR(p) for p = 1..=max_order and keep the lowest-AIC fit.
pub(crate) fn select_ar(
    values: &[f64],
    max_order: usize,
    model: &'static str,
) -> Result<ArFit> {
    let mut best: Option<(f64, ArFit)> = None;
    let mut last_error = None;

    for p in 1..=max_order.max(1) {
        match fit_ar(values, p, model) {
            Ok((aic, fit)) => {
                if best.as_ref().is_none_or(|(best_aic, _)| aic < *best_aic) {
                    best = Some((aic, fit));
                }
            }
            Err(err) => last_error = Some(err),
        }
    }

    match best {
        Some((_, fit)) => Ok(fit),
        None => Err(last_error.unwrap_or(ForecastError::ModelFit {
            model,
            reason: "no AR order could be fitted".into(),
        })),
    }
}

/// Conditional least-squares AR(p) fit with AIC.
fn fit_ar(values: &[f64], p: usize, model: &'static str) -> Result<(f64, ArFit)> {
    let n = values.len();
    if n < 2 * p + 2 {
        return Err(ForecastError::ModelFit {
            model,
            reason: format!("{} points is too few for AR({})", n, p),
        });
    }

    let rows = n - p;
    let k = p + 1; // intercept + p lags

    // Normal equations X'X b = X'y with rows [1, y_{t-1}, ..., y_{t-p}].
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for t in p..n {
        let mut x = Vec::with_capacity(k);
        x.push(1.0);
        for lag in 1..=p {
            x.push(values[t - lag]);
        }
        for i in 0..k {
            xty[i] += x[i] * values[t];
            for j in 0..k {
                xtx[i][j] += x[i] * x[j];
            }
        }
    }

    let params = solve_linear_system(xtx, xty).ok_or_else(|| ForecastError::ModelFit {
        model,
        reason: format!("singular normal equations at order {}", p),
    })?;

    let intercept = params[0];
    let coeffs = params[1..].to_vec();

    let mut sse = 0.0;
    for t in p..n {
        let mut fitted = intercept;
        for (lag, coeff) in coeffs.iter().enumerate() {
            fitted += coeff * values[t - 1 - lag];
        }
        sse += (values[t] - fitted).powi(2);
    }

    if !sse.is_finite() {
        return Err(ForecastError::ModelFit {
            model,
            reason: format!("non-finite residuals at order {}", p),
        });
    }

    let sigma = (sse / rows as f64).sqrt();
    let aic = rows as f64 * (sse / rows as f64 + 1e-12).ln() + 2.0 * k as f64;

    Ok((
        aic,
        ArFit {
            order: p,
            intercept,
            coeffs,
            sigma,
        },
    ))
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns None for singular systems.
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }

    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
