//! Property-based tests for the forecasting pipeline.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated sales series.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use sales_forecast::backtest::{min_train_size, rolling_origin_backtest};
use sales_forecast::models::{
    AutoRegressive, LinearTrend, ModelFitter, SeasonalAutoRegressive, SeasonalDecomposition,
};
use sales_forecast::prelude::*;
use sales_forecast::prepare::{prepare_weekly_series, week_end};

fn sunday(offset_weeks: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 7).unwrap() + Duration::weeks(offset_weeks)
}

fn weekly_records(values: &[f64]) -> Vec<RawRecord> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| RawRecord::new(sunday(i as i64), *v))
        .collect()
}

/// Positive weekly amounts with a little per-week variation so the series
/// is never exactly constant.
fn sales_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(10.0..5000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.01;
            }
            v
        })
    })
}

/// Records on arbitrary dates within a two-year window.
fn scattered_records_strategy() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec((0i64..730, 1.0..2000.0_f64), 30..120).prop_map(|pairs| {
        let base = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        pairs
            .into_iter()
            .map(|(offset, amount)| RawRecord::new(base + Duration::days(offset), amount))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn fitters_keep_bounds_ordered_and_non_negative(
        values in sales_strategy(60, 120),
        horizon in 1usize..12
    ) {
        let fitters: Vec<Box<dyn ModelFitter>> = vec![
            Box::new(LinearTrend::default()),
            Box::new(AutoRegressive::default()),
            Box::new(SeasonalDecomposition::default()),
            Box::new(SeasonalAutoRegressive::default()),
        ];

        for fitter in &fitters {
            // A fitter may decline the series; when it accepts, the
            // forecast must be well-formed.
            if let Ok(forecast) = fitter.fit(&values, horizon) {
                prop_assert_eq!(forecast.horizon(), horizon);
                for i in 0..horizon {
                    prop_assert!(forecast.point[i].is_finite());
                    prop_assert!(forecast.point[i] >= 0.0, "{} point negative", fitter.name());
                    prop_assert!(forecast.lower[i] >= 0.0);
                    prop_assert!(forecast.lower[i] <= forecast.point[i]);
                    prop_assert!(forecast.point[i] <= forecast.upper[i]);
                }
            }
        }
    }

    #[test]
    fn prepared_series_is_gap_free_and_sunday_aligned(
        records in scattered_records_strategy()
    ) {
        let prepared = prepare_weekly_series(&records, NegativePolicy::KeepSigned).unwrap();
        let week_ends = prepared.series.week_ends();

        for pair in week_ends.windows(2) {
            prop_assert_eq!((pair[1] - pair[0]).num_days(), 7);
        }
        for date in week_ends {
            prop_assert_eq!(week_end(*date), *date);
        }
        // Every record lands inside the series span.
        let first = week_ends[0];
        let last = *week_ends.last().unwrap();
        for record in &records {
            let bucket = week_end(record.date);
            prop_assert!(bucket >= first && bucket <= last);
        }
    }

    #[test]
    fn pipeline_is_deterministic(
        values in sales_strategy(20, 80),
        horizon in 1usize..8
    ) {
        let records = weekly_records(&values);
        let config = ForecastConfig::default();

        let first = forecast_weekly(&records, horizon, &config);
        let second = forecast_weekly(&records, horizon, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn pipeline_output_is_always_well_formed(
        values in sales_strategy(4, 60),
        horizon in 1usize..8
    ) {
        let records = weekly_records(&values);
        let result = forecast_weekly(&records, horizon, &ForecastConfig::default());

        prop_assert!(result.total_forecast >= 0.0);
        prop_assert!(result.historical.len() <= 8);
        for entry in &result.forecast {
            prop_assert!(entry.sales >= 0.0);
            prop_assert!(entry.lower <= entry.sales);
            prop_assert!(entry.sales <= entry.upper);
        }
        if !result.forecast.is_empty() {
            prop_assert_eq!(result.forecast.len(), horizon + 1);
        }
    }

    #[test]
    fn sparse_history_is_always_low_confidence(
        values in sales_strategy(4, 16),
        horizon in 1usize..6
    ) {
        let records = weekly_records(&values);
        let result = forecast_weekly(&records, horizon, &ForecastConfig::default());
        prop_assert_eq!(result.accuracy.confidence, ConfidenceTier::Low);
    }

    #[test]
    fn backtest_metrics_are_finite_and_bounded(
        values in sales_strategy(30, 100),
        horizon in 1usize..6
    ) {
        let config = ForecastConfig::default();
        let min_train = min_train_size(values.len());

        if let Ok(metrics) = rolling_origin_backtest(&values, horizon, min_train, &config) {
            prop_assert!(metrics.mape >= 0.0);
            prop_assert!(metrics.rmse >= 0.0);
            prop_assert!(metrics.r2 <= 1.0);
            prop_assert!((0.0..=100.0).contains(&metrics.accuracy));
        }
    }
}
