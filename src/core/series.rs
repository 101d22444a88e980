//! Weekly series data structures.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// A single transaction-level record: a date and a signed amount.
///
/// Amounts may be negative (returns) or zero-valued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRecord {
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction amount.
    pub amount: f64,
}

impl RawRecord {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// A gap-free weekly aggregated series.
///
/// One entry per calendar week between the first and last observed week,
/// inclusive. Construction enforces the cadence invariant: week-ending
/// dates are strictly increasing and spaced exactly seven days apart.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklySeries {
    week_ends: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl WeeklySeries {
    /// Create a weekly series, validating the cadence invariant.
    pub fn new(week_ends: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if week_ends.len() != values.len() {
            return Err(ForecastError::Cadence(format!(
                "{} dates but {} values",
                week_ends.len(),
                values.len()
            )));
        }
        for i in 1..week_ends.len() {
            let gap = (week_ends[i] - week_ends[i - 1]).num_days();
            if gap != 7 {
                return Err(ForecastError::Cadence(format!(
                    "weeks {} and {} are {} days apart, expected 7",
                    i - 1,
                    i,
                    gap
                )));
            }
        }
        Ok(Self { week_ends, values })
    }

    /// Number of weeks in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no weeks.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Week-ending dates.
    pub fn week_ends(&self) -> &[NaiveDate] {
        &self.week_ends
    }

    /// Aggregated values, one per week.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The last week-ending date, if any.
    pub fn last_week_end(&self) -> Option<NaiveDate> {
        self.week_ends.last().copied()
    }

    /// Replace the values, keeping the calendar. Lengths must match.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        Self::new(self.week_ends.clone(), values)
    }

    /// Mutable view of the values. The calendar is untouched, so the
    /// cadence invariant cannot be violated through this.
    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Fraction of weeks with an exactly-zero value.
    pub fn sparsity(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let zeros = self.values.iter().filter(|v| **v == 0.0).count();
        zeros as f64 / self.values.len() as f64
    }

    /// Values of weeks with a strictly positive value, in calendar order.
    ///
    /// This is the "usable points" view that gates model eligibility.
    pub fn nonzero_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| *v > 0.0).collect()
    }

    /// `(week_end, value)` pairs for weeks with a strictly positive value.
    pub fn nonzero_points(&self) -> Vec<(NaiveDate, f64)> {
        self.week_ends
            .iter()
            .zip(self.values.iter())
            .filter(|(_, v)| **v > 0.0)
            .map(|(d, v)| (*d, *v))
            .collect()
    }

    /// The most recent strictly positive value, if any.
    pub fn last_nonzero_value(&self) -> Option<f64> {
        self.values.iter().rev().copied().find(|v| *v > 0.0)
    }
}

/// A weekly series after anomaly capping.
///
/// Same length and calendar as the input series; anomalous points are
/// capped in place, never removed, so indexing stays aligned with the
/// original calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    /// The capped series.
    pub series: WeeklySeries,
    /// Indices of the weeks that were flagged as anomalous.
    pub anomalies: Vec<usize>,
}

impl CleanedSeries {
    /// A cleaned series with nothing flagged.
    pub fn unchanged(series: WeeklySeries) -> Self {
        Self {
            series,
            anomalies: Vec::new(),
        }
    }
}
