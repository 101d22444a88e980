//! Final forecast assembly.
//!
//! Combines the model forecast, accuracy report, and historical context
//! into the output contract: a connector point at the last actual, a
//! December uplift on late-December weeks, two-decimal rounding, and the
//! last eight non-zero weeks of history.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::ForecastConfig;
use crate::core::{
    AccuracyReport, ForecastEntry, ForecastResult, HistoricalEntry, IntervalForecast, WeeklySeries,
};
use crate::error::{ForecastError, Result};
use crate::utils::stats::round2;

/// Number of historical weeks returned for context.
const HISTORICAL_WEEKS: usize = 8;

/// Whether a week-ending date falls in the December 18-31 uplift window.
fn in_december_window(date: NaiveDate) -> bool {
    date.month() == 12 && (18..=31).contains(&date.day())
}

fn week_label(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Assemble the final forecast result.
///
/// The forecast array starts with a connector point equal to the last
/// known non-zero actual so a plotted line connects history and forecast
/// without a gap. The total sums all forecast point estimates, connector
/// included.
pub fn assemble(
    cleaned: &WeeklySeries,
    forecast: &IntervalForecast,
    accuracy: AccuracyReport,
    model_used: String,
    config: &ForecastConfig,
) -> Result<ForecastResult> {
    let last_date = cleaned.last_week_end().ok_or(ForecastError::EmptyData)?;
    let last_actual = cleaned.last_nonzero_value().unwrap_or(0.0);

    let mut entries = Vec::with_capacity(forecast.horizon() + 1);
    entries.push(ForecastEntry {
        week: week_label(last_date),
        sales: round2(last_actual),
        lower: round2(last_actual),
        upper: round2(last_actual),
    });

    for i in 0..forecast.horizon() {
        let date = last_date + Duration::weeks(i as i64 + 1);
        let uplift = if in_december_window(date) {
            config.december_uplift
        } else {
            1.0
        };
        entries.push(ForecastEntry {
            week: week_label(date),
            sales: round2(forecast.point[i] * uplift),
            lower: round2(forecast.lower[i] * uplift),
            upper: round2(forecast.upper[i] * uplift),
        });
    }

    let total_forecast = round2(entries.iter().map(|e| e.sales).sum());

    let historical: Vec<HistoricalEntry> = cleaned
        .nonzero_points()
        .iter()
        .rev()
        .take(HISTORICAL_WEEKS)
        .rev()
        .map(|(date, value)| HistoricalEntry {
            date: week_label(*date),
            sales: round2(*value),
        })
        .collect();

    Ok(ForecastResult {
        historical,
        forecast: entries,
        total_forecast,
        accuracy,
        model_used,
    })
}
