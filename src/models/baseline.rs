//! Baseline linear-trend model.
//!
//! Ordinary least squares of value on week index, with interval bounds at
//! a fixed multiple of the historical standard deviation. This is the
//! fallback of last resort: it has no failure mode on non-empty input.

use crate::core::IntervalForecast;
use crate::error::{ForecastError, Result};
use crate::models::ModelFitter;
use crate::utils::stats::population_std_dev;

/// Linear-trend fitter.
#[derive(Debug, Clone)]
pub struct LinearTrend {
    /// Width of the interval bounds in standard deviations.
    pub interval_multiplier: f64,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self {
            interval_multiplier: 1.5,
        }
    }
}

impl LinearTrend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the OLS line `y = intercept + slope * index`.
    ///
    /// A single observation yields a flat line.
    pub(crate) fn fit_line(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let x_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut num = 0.0;
        let mut denom = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - x_mean;
            num += dx * (y - y_mean);
            denom += dx * dx;
        }

        let slope = if denom > 0.0 { num / denom } else { 0.0 };
        let intercept = y_mean - slope * x_mean;
        (intercept, slope)
    }
}

impl ModelFitter for LinearTrend {
    fn fit(&self, values: &[f64], horizon: usize) -> Result<IntervalForecast> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let (intercept, slope) = Self::fit_line(values);
        let n = values.len();
        let sd = population_std_dev(values);
        let band = self.interval_multiplier * sd;

        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        for h in 0..horizon {
            let estimate = intercept + slope * (n + h) as f64;
            point.push(estimate);
            lower.push(estimate - band);
            upper.push(estimate + band);
        }

        let mut forecast = IntervalForecast::new(point, lower, upper)?;
        forecast.clamp_non_negative();
        Ok(forecast)
    }

    fn name(&self) -> &'static str {
        "Linear Baseline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn extrapolates_a_perfect_line() {
        let values: Vec<f64> = (0..10).map(|i| 10.0 + 2.0 * i as f64).collect();
        let forecast = LinearTrend::new().fit(&values, 3).unwrap();

        // Next points continue the line: 30, 32, 34.
        assert_relative_eq!(forecast.point[0], 30.0, epsilon = 1e-8);
        assert_relative_eq!(forecast.point[1], 32.0, epsilon = 1e-8);
        assert_relative_eq!(forecast.point[2], 34.0, epsilon = 1e-8);
    }

    #[test]
    fn bounds_are_one_and_a_half_sigma_wide() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let sd = population_std_dev(&values);
        let forecast = LinearTrend::new().fit(&values, 1).unwrap();

        assert_relative_eq!(
            forecast.upper[0] - forecast.point[0],
            1.5 * sd,
            epsilon = 1e-8
        );
    }

    #[test]
    fn constant_series_forecasts_flat() {
        let values = vec![50.0; 8];
        let forecast = LinearTrend::new().fit(&values, 4).unwrap();

        for p in &forecast.point {
            assert_relative_eq!(*p, 50.0, epsilon = 1e-8);
        }
        // Zero variance, so bounds collapse onto the point estimate.
        assert_relative_eq!(forecast.lower[0], 50.0, epsilon = 1e-8);
        assert_relative_eq!(forecast.upper[0], 50.0, epsilon = 1e-8);
    }

    #[test]
    fn negative_trend_is_clamped_at_zero() {
        let values: Vec<f64> = (0..10).map(|i| 90.0 - 10.0 * i as f64).collect();
        let forecast = LinearTrend::new().fit(&values, 5).unwrap();

        for i in 0..5 {
            assert!(forecast.point[i] >= 0.0);
            assert!(forecast.lower[i] >= 0.0);
            assert!(forecast.lower[i] <= forecast.point[i]);
            assert!(forecast.point[i] <= forecast.upper[i]);
        }
        // Far enough out, the line is below zero and clamps to it.
        assert_relative_eq!(forecast.point[4], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn single_point_forecasts_its_own_value() {
        let forecast = LinearTrend::new().fit(&[42.0], 2).unwrap();
        assert_relative_eq!(forecast.point[0], 42.0, epsilon = 1e-8);
        assert_relative_eq!(forecast.point[1], 42.0, epsilon = 1e-8);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            LinearTrend::new().fit(&[], 4),
            Err(ForecastError::EmptyData)
        ));
    }
}
