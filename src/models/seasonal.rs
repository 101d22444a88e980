//! Seasonal model fitters: additive decomposition and seasonal AR.
//!
//! Both assume a yearly cycle on weekly data (period 52) and require at
//! least one full cycle of usable points.

use crate::core::IntervalForecast;
use crate::error::{ForecastError, Result};
use crate::models::autoregressive::select_ar;
use crate::models::baseline::LinearTrend;
use crate::models::ModelFitter;
use crate::utils::stats::{quantile_normal, std_dev};

/// Weeks in a yearly cycle.
pub const YEARLY_PERIOD: usize = 52;

/// Seasonal-trend decomposition fitter.
///
/// Decomposes the series into an OLS trend line and additive seasonal
/// indices at the yearly period, then extrapolates both. Interval bounds
/// come from the decomposition residuals.
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    /// Seasonal period in weeks.
    pub period: usize,
    /// Interval coverage level in (0, 1).
    pub level: f64,
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self {
            period: YEARLY_PERIOD,
            level: 0.85,
        }
    }
}

impl SeasonalDecomposition {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelFitter for SeasonalDecomposition {
    fn fit(&self, values: &[f64], horizon: usize) -> Result<IntervalForecast> {
        let n = values.len();
        if n < self.period {
            return Err(ForecastError::ModelFit {
                model: "Seasonal Decomposition",
                reason: format!("requires {} points, got {}", self.period, n),
            });
        }

        let (intercept, slope) = LinearTrend::fit_line(values);
        if !intercept.is_finite() || !slope.is_finite() {
            return Err(ForecastError::ModelFit {
                model: "Seasonal Decomposition",
                reason: "non-finite trend line".into(),
            });
        }

        // Additive seasonal indices on the detrended series, normalized
        // to zero mean so the trend keeps the level.
        let detrended: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(i, y)| y - (intercept + slope * i as f64))
            .collect();

        let mut seasonal = vec![0.0; self.period];
        let mut counts = vec![0usize; self.period];
        for (i, d) in detrended.iter().enumerate() {
            seasonal[i % self.period] += d;
            counts[i % self.period] += 1;
        }
        for (s, c) in seasonal.iter_mut().zip(counts.iter()) {
            *s /= (*c).max(1) as f64;
        }
        let seasonal_mean = seasonal.iter().sum::<f64>() / self.period as f64;
        for s in seasonal.iter_mut() {
            *s -= seasonal_mean;
        }

        let residuals: Vec<f64> = detrended
            .iter()
            .enumerate()
            .map(|(i, d)| d - seasonal[i % self.period])
            .collect();
        let sigma = std_dev(&residuals);
        let sigma = if sigma.is_finite() { sigma } else { 0.0 };

        let z = quantile_normal((1.0 + self.level) / 2.0);
        let band = z * sigma;

        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for h in 0..horizon {
            let t = n + h;
            let estimate = intercept + slope * t as f64 + seasonal[t % self.period];
            if !estimate.is_finite() {
                return Err(ForecastError::ModelFit {
                    model: "Seasonal Decomposition",
                    reason: "non-finite forecast".into(),
                });
            }
            point.push(estimate);
            lower.push(estimate - band);
            upper.push(estimate + band);
        }

        let mut forecast = IntervalForecast::new(point, lower, upper)?;
        forecast.clamp_non_negative();
        Ok(forecast)
    }

    fn name(&self) -> &'static str {
        "Seasonal Decomposition"
    }
}

/// Seasonal autoregressive fitter.
///
/// Differences the series at the seasonal lag, fits an auto-selected AR
/// on the differences, and inverts the differencing for forecasts.
#[derive(Debug, Clone)]
pub struct SeasonalAutoRegressive {
    /// Seasonal period in weeks.
    pub period: usize,
    /// Highest AR order considered on the differenced series.
    pub max_order: usize,
    /// Interval coverage level in (0, 1).
    pub level: f64,
}

impl Default for SeasonalAutoRegressive {
    fn default() -> Self {
        Self {
            period: YEARLY_PERIOD,
            max_order: 2,
            level: 0.85,
        }
    }
}

impl SeasonalAutoRegressive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelFitter for SeasonalAutoRegressive {
    fn fit(&self, values: &[f64], horizon: usize) -> Result<IntervalForecast> {
        let n = values.len();
        if n <= self.period {
            return Err(ForecastError::ModelFit {
                model: "Seasonal AR",
                reason: format!(
                    "requires more than {} points for seasonal differencing, got {}",
                    self.period, n
                ),
            });
        }
        if horizon > self.period {
            return Err(ForecastError::ModelFit {
                model: "Seasonal AR",
                reason: format!(
                    "horizon {} exceeds the seasonal period {}",
                    horizon, self.period
                ),
            });
        }

        let diffs: Vec<f64> = (self.period..n)
            .map(|i| values[i] - values[i - self.period])
            .collect();

        let fit = select_ar(&diffs, self.max_order, "Seasonal AR")?;
        let diff_forecast = fit.forecast(&diffs, horizon, "Seasonal AR")?;

        // Invert the seasonal differencing: each forecast adds the
        // predicted difference onto the value one period earlier.
        let z = quantile_normal((1.0 + self.level) / 2.0);
        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for (h, d) in diff_forecast.iter().enumerate() {
            let base = values[n + h - self.period];
            let estimate = base + d;
            let se = fit.sigma * ((h + 1) as f64).sqrt();
            point.push(estimate);
            lower.push(estimate - z * se);
            upper.push(estimate + z * se);
        }

        let mut forecast = IntervalForecast::new(point, lower, upper)?;
        forecast.clamp_non_negative();
        Ok(forecast)
    }

    fn name(&self) -> &'static str {
        "Seasonal AR"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn yearly_sine(weeks: usize) -> Vec<f64> {
        (0..weeks)
            .map(|i| {
                1000.0
                    + 2.0 * i as f64
                    + 200.0 * (2.0 * PI * i as f64 / 52.0).sin()
                    + 15.0 * (i as f64 * 0.9).sin()
            })
            .collect()
    }

    #[test]
    fn decomposition_rejects_short_series() {
        let values = vec![100.0; 51];
        let err = SeasonalDecomposition::new().fit(&values, 4).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ModelFit {
                model: "Seasonal Decomposition",
                ..
            }
        ));
    }

    #[test]
    fn decomposition_tracks_a_seasonal_pattern() {
        let values = yearly_sine(104);
        let forecast = SeasonalDecomposition::new().fit(&values, 8).unwrap();

        assert_eq!(forecast.horizon(), 8);
        // Forecasts continue the pattern one period later: each point
        // should be close to the value 52 weeks before it plus the trend.
        for (h, p) in forecast.point.iter().enumerate() {
            let reference = values[104 + h - 52] + 2.0 * 52.0;
            assert!(
                (p - reference).abs() < 60.0,
                "h={}: {} vs reference {}",
                h,
                p,
                reference
            );
        }
    }

    #[test]
    fn decomposition_output_is_well_formed() {
        let values = yearly_sine(80);
        let forecast = SeasonalDecomposition::new().fit(&values, 12).unwrap();

        for i in 0..12 {
            assert!(forecast.point[i] >= 0.0);
            assert!(forecast.lower[i] <= forecast.point[i]);
            assert!(forecast.point[i] <= forecast.upper[i]);
        }
    }

    #[test]
    fn seasonal_ar_needs_more_than_one_period() {
        let values = vec![10.0; 52];
        let err = SeasonalAutoRegressive::new().fit(&values, 4).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::ModelFit {
                model: "Seasonal AR",
                ..
            }
        ));
    }

    #[test]
    fn seasonal_ar_fits_two_years_of_data() {
        let values = yearly_sine(110);
        let forecast = SeasonalAutoRegressive::new().fit(&values, 8).unwrap();

        assert_eq!(forecast.horizon(), 8);
        for i in 0..8 {
            assert!(forecast.point[i].is_finite());
            assert!(forecast.point[i] >= 0.0);
            assert!(forecast.lower[i] <= forecast.upper[i]);
        }
        // Forecast should stay in the general range of the series.
        let max = values.iter().cloned().fold(f64::MIN, f64::max);
        for p in &forecast.point {
            assert!(*p < 2.0 * max);
        }
    }

    #[test]
    fn seasonal_ar_rejects_horizon_past_one_period() {
        let values = yearly_sine(110);
        let err = SeasonalAutoRegressive::new().fit(&values, 60).unwrap_err();
        assert!(matches!(err, ForecastError::ModelFit { .. }));
    }
}
