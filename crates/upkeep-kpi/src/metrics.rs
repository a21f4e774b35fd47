//! The three availability formulas.
//!
//! Each function takes plain values so it can be reused for a single asset,
//! a pooled fleet computation, or test fixtures without building records.

use chrono::NaiveDateTime;
use serde::Serialize;
use upkeep_core::util::time::hours_between;

use crate::error::{KpiError, Metric};

/// Mean interval between consecutive failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalStats {
    /// Mean gap in hours
    pub mean_hours: f64,
    /// Sum of all gaps in hours
    pub total_hours: f64,
    /// Number of gaps (failures minus one)
    pub intervals: usize,
}

/// Computes MTBF from the failure timestamps of a single asset.
///
/// The input does not need to be sorted. Requires at least two timestamps.
pub fn mtbf_hours(timestamps: &[NaiveDateTime]) -> Result<IntervalStats, KpiError> {
    if timestamps.len() < 2 {
        return Err(KpiError::insufficient(Metric::Mtbf, 2, timestamps.len()));
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let total_hours: f64 = sorted
        .windows(2)
        .map(|pair| hours_between(&pair[0], &pair[1]))
        .sum();
    let intervals = sorted.len() - 1;

    Ok(IntervalStats {
        mean_hours: total_hours / intervals as f64,
        total_hours,
        intervals,
    })
}

/// Computes MTTR as the mean of the downtime durations.
///
/// Values are summed in ascending order so the result is bit-for-bit the
/// same for any permutation of the input.
pub fn mttr_hours(downtimes: &[f64]) -> Result<f64, KpiError> {
    if downtimes.is_empty() {
        return Err(KpiError::insufficient(Metric::Mttr, 1, 0));
    }
    Ok(sorted_sum(downtimes) / downtimes.len() as f64)
}

/// Computes `mtbf / (mtbf + mttr)`.
pub fn availability(mtbf: f64, mttr: f64) -> Result<f64, KpiError> {
    let sum = mtbf + mttr;
    if !sum.is_finite() || sum <= 0.0 {
        return Err(KpiError::undefined(
            Metric::Availability,
            "MTBF + MTTR is not positive",
        ));
    }
    Ok(mtbf / sum)
}

pub(crate) fn sorted_sum(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted.iter().sum()
}
