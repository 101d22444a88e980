//! Anomaly detection and capping for weekly series.
//!
//! Anomalous points are capped, never removed, so the cleaned series keeps
//! the length and calendar of its input.

use tracing::info;

use crate::core::{CleanedSeries, WeeklySeries};
use crate::utils::stats::{mean, quantile, std_dev};

/// Minimum series length for detection; shorter series pass through.
const MIN_POINTS: usize = 4;

/// Method for anomaly detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyMethod {
    /// Normalized deviation from the mean, capped at `mean + 2*stddev`.
    ZScore,
    /// Interquartile range fences, clipped to the fence values.
    Iqr,
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyConfig {
    /// Detection method.
    pub method: AnomalyMethod,
    /// Z-score threshold (ZScore method) or IQR multiplier (Iqr method).
    pub threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            method: AnomalyMethod::ZScore,
            threshold: 3.0,
        }
    }
}

impl AnomalyConfig {
    /// Z-score detection with the given threshold (default 3.0).
    pub fn z_score(threshold: f64) -> Self {
        Self {
            method: AnomalyMethod::ZScore,
            threshold,
        }
    }

    /// IQR detection with the given fence multiplier (default 1.5).
    pub fn iqr(multiplier: f64) -> Self {
        Self {
            method: AnomalyMethod::Iqr,
            threshold: multiplier,
        }
    }
}

/// Detect anomalous weeks and cap them.
///
/// Returns the capped series together with the indices of flagged weeks.
/// Series shorter than four points pass through unchanged.
pub fn detect_and_cap(series: &WeeklySeries, config: &AnomalyConfig) -> CleanedSeries {
    if series.len() < MIN_POINTS {
        return CleanedSeries::unchanged(series.clone());
    }

    let cleaned = match config.method {
        AnomalyMethod::ZScore => cap_z_score(series, config.threshold),
        AnomalyMethod::Iqr => cap_iqr(series, config.threshold),
    };

    if !cleaned.anomalies.is_empty() {
        info!(
            count = cleaned.anomalies.len(),
            method = ?config.method,
            indices = ?cleaned.anomalies,
            "capped anomalous weeks"
        );
    }

    cleaned
}

fn cap_z_score(series: &WeeklySeries, threshold: f64) -> CleanedSeries {
    let values = series.values();
    let m = mean(values);
    let sd = std_dev(values);

    if !sd.is_finite() || sd < 1e-10 {
        return CleanedSeries::unchanged(series.clone());
    }

    // High outliers are pulled down to the cap; low outliers are flagged
    // but left in place, matching a one-sided min() cap.
    let cap = m + 2.0 * sd;
    let mut anomalies = Vec::new();
    let mut capped = series.clone();

    for (i, value) in values.iter().enumerate() {
        if ((value - m) / sd).abs() > threshold {
            anomalies.push(i);
            capped.values_mut()[i] = value.min(cap);
        }
    }

    CleanedSeries {
        series: capped,
        anomalies,
    }
}

fn cap_iqr(series: &WeeklySeries, multiplier: f64) -> CleanedSeries {
    let values = series.values();
    let q1 = quantile(values, 0.25);
    let q3 = quantile(values, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;

    let mut anomalies = Vec::new();
    let mut capped = series.clone();

    for (i, value) in values.iter().enumerate() {
        if *value < lower || *value > upper {
            anomalies.push(i);
            capped.values_mut()[i] = value.clamp(lower, upper);
        }
    }

    CleanedSeries {
        series: capped,
        anomalies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weekly(values: Vec<f64>) -> WeeklySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let week_ends: Vec<NaiveDate> = (0..values.len())
            .map(|i| start + chrono::Duration::weeks(i as i64))
            .collect();
        WeeklySeries::new(week_ends, values).unwrap()
    }

    #[test]
    fn z_score_flags_and_caps_spike() {
        let mut values = vec![100.0; 30];
        values[10] = 10_000.0;
        let series = weekly(values);

        let cleaned = detect_and_cap(&series, &AnomalyConfig::default());

        assert_eq!(cleaned.anomalies, vec![10]);
        // Capped below the spike, above the typical level.
        assert!(cleaned.series.values()[10] < 10_000.0);
        assert!(cleaned.series.values()[10] > 100.0);
        // Everything else untouched.
        assert_eq!(cleaned.series.values()[0], 100.0);
    }

    #[test]
    fn z_score_preserves_length_and_calendar() {
        let mut values: Vec<f64> = (0..40).map(|i| 50.0 + i as f64).collect();
        values[5] = 5_000.0;
        let series = weekly(values);

        let cleaned = detect_and_cap(&series, &AnomalyConfig::default());

        assert_eq!(cleaned.series.len(), series.len());
        assert_eq!(cleaned.series.week_ends(), series.week_ends());
    }

    #[test]
    fn iqr_caps_to_fence_values() {
        let mut values = vec![100.0; 20];
        for (i, v) in values.iter_mut().enumerate() {
            *v += i as f64; // spread so IQR is non-zero
        }
        values[3] = 2_000.0;
        values[15] = -500.0;
        let series = weekly(values);

        let cleaned = detect_and_cap(&series, &AnomalyConfig::iqr(1.5));

        assert!(cleaned.anomalies.contains(&3));
        assert!(cleaned.anomalies.contains(&15));
        assert!(cleaned.series.values()[3] < 2_000.0);
        assert!(cleaned.series.values()[15] > -500.0);
    }

    #[test]
    fn short_series_pass_through_unchanged() {
        let series = weekly(vec![1.0, 1_000.0, 2.0]);
        let cleaned = detect_and_cap(&series, &AnomalyConfig::default());

        assert!(cleaned.anomalies.is_empty());
        assert_eq!(cleaned.series, series);
    }

    #[test]
    fn constant_series_has_no_anomalies() {
        let series = weekly(vec![42.0; 20]);
        let cleaned = detect_and_cap(&series, &AnomalyConfig::default());
        assert!(cleaned.anomalies.is_empty());

        let cleaned = detect_and_cap(&series, &AnomalyConfig::iqr(1.5));
        assert!(cleaned.anomalies.is_empty());
    }

    #[test]
    fn clean_series_is_untouched() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.3).sin() * 10.0).collect();
        let series = weekly(values.clone());

        let cleaned = detect_and_cap(&series, &AnomalyConfig::default());

        assert!(cleaned.anomalies.is_empty());
        assert_eq!(cleaned.series.values(), values.as_slice());
    }
}
