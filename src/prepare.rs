//! Weekly series preparation from raw transaction records.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, warn};

use crate::core::{RawRecord, WeeklySeries};
use crate::error::{ForecastError, Result};

/// Minimum number of aggregated weeks the pipeline can work with.
pub const MIN_WEEKS: usize = 4;

/// Sparsity fraction above which a diagnostic warning is emitted.
const SPARSITY_WARN_FRACTION: f64 = 0.3;

/// How negative amounts (returns) are folded into the weekly aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativePolicy {
    /// Sum amounts as signed values.
    #[default]
    KeepSigned,
    /// Take the absolute value of every amount.
    Absolute,
    /// Aggregate positive amounts only; negative totals are reported
    /// separately as a diagnostic.
    Segregate,
}

/// A prepared weekly series plus preparation diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    /// Gap-free weekly aggregate.
    pub series: WeeklySeries,
    /// Fraction of zero-valued weeks. Diagnostic only, never drives
    /// control flow.
    pub sparsity: f64,
    /// Absolute total of negative amounts excluded under
    /// [`NegativePolicy::Segregate`]; zero under the other policies.
    pub segregated_returns: f64,
}

/// The Sunday-ending week boundary containing `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let offset = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + Duration::days(offset as i64)
}

/// Aggregate raw records into a gap-free weekly series.
///
/// Records are grouped by Sunday week-ending boundary and summed, then the
/// series is reindexed over the full `[first, last]` week span with absent
/// weeks filled with zero.
///
/// Fails with [`ForecastError::InsufficientData`] if fewer than
/// [`MIN_WEEKS`] weeks result.
pub fn prepare_weekly_series(
    records: &[RawRecord],
    policy: NegativePolicy,
) -> Result<PreparedSeries> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut segregated_returns = 0.0;

    for record in records {
        let amount = match policy {
            NegativePolicy::KeepSigned => record.amount,
            NegativePolicy::Absolute => record.amount.abs(),
            NegativePolicy::Segregate => {
                if record.amount < 0.0 {
                    segregated_returns += -record.amount;
                    continue;
                }
                record.amount
            }
        };
        *buckets.entry(week_end(record.date)).or_insert(0.0) += amount;
    }

    let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(ForecastError::InsufficientData {
                needed: MIN_WEEKS,
                got: 0,
            })
        }
    };

    // Reindex over the full span, zero-filling absent weeks.
    let mut week_ends = Vec::new();
    let mut values = Vec::new();
    let mut week = first;
    while week <= last {
        week_ends.push(week);
        values.push(buckets.get(&week).copied().unwrap_or(0.0));
        week += Duration::weeks(1);
    }

    let got = values.len();
    if got < MIN_WEEKS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_WEEKS,
            got,
        });
    }

    let series = WeeklySeries::new(week_ends, values)?;
    let sparsity = series.sparsity();

    if sparsity > SPARSITY_WARN_FRACTION {
        warn!(
            sparsity_pct = sparsity * 100.0,
            weeks = got,
            "high sparsity in prepared weekly series"
        );
    }
    debug!(
        weeks = got,
        sparsity_pct = sparsity * 100.0,
        ?policy,
        "prepared weekly series"
    );

    Ok(PreparedSeries {
        series,
        sparsity,
        segregated_returns,
    })
}
