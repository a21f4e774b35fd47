//! Failure statistics over a period and the fleet overview.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use upkeep_core::{Asset, AssetId, Failure, FailureStatus, WorkOrder};

use crate::metrics::sorted_sum;

/// Label used for failures without a recorded root cause.
pub const UNSPECIFIED_CAUSE: &str = "unspecified";

/// Number of root causes listed in a report.
pub const TOP_CAUSES: usize = 5;

/// An inclusive time window. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Period {
    /// Earliest timestamp included
    pub from: Option<NaiveDateTime>,
    /// Latest timestamp included
    pub to: Option<NaiveDateTime>,
}

impl Period {
    /// A period with no bounds.
    pub fn all() -> Self {
        Self::default()
    }

    /// A period covering whole days: from the start of `from` to the last
    /// nanosecond of `to`, so sub-second timestamps on the last day count.
    pub fn from_dates(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let end_of_day =
            NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
        Self {
            from: from.map(|d| d.and_time(NaiveTime::MIN)),
            to: to.map(|d| d.and_time(end_of_day)),
        }
    }

    /// Whether `at` falls inside the period.
    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        self.from.is_none_or(|from| *at >= from) && self.to.is_none_or(|to| *at <= to)
    }
}

/// How often a root cause appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CauseCount {
    /// Root cause text
    pub cause: String,
    /// Number of failures
    pub count: usize,
}

/// Summary of the failures in a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureStatistics {
    /// The period covered
    pub period: Period,
    /// Failures in the period
    pub total_failures: usize,
    /// Mean downtime per failure, hours
    pub mean_repair_hours: f64,
    /// Total downtime, hours
    pub total_downtime_hours: f64,
    /// Total recorded repair cost
    pub total_repair_cost: f64,
    /// Most frequent root causes, most frequent first
    pub top_root_causes: Vec<CauseCount>,
    /// Failures per status
    pub by_status: BTreeMap<FailureStatus, usize>,
}

impl FailureStatistics {
    /// Computes the report. Returns `None` when no failure falls inside `period`.
    pub fn compute(failures: &[Failure], period: Period) -> Option<Self> {
        let selected: Vec<&Failure> = failures
            .iter()
            .filter(|f| period.contains(&f.occurred_at))
            .collect();
        if selected.is_empty() {
            return None;
        }

        let downtimes: Vec<f64> = selected.iter().map(|f| f.downtime_hours).collect();
        let costs: Vec<f64> = selected.iter().filter_map(|f| f.repair_cost).collect();
        let total_downtime_hours = sorted_sum(&downtimes);

        let mut causes: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_status: BTreeMap<FailureStatus, usize> = BTreeMap::new();
        for failure in &selected {
            let cause = failure
                .root_cause
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNSPECIFIED_CAUSE);
            *causes.entry(cause).or_default() += 1;
            *by_status.entry(failure.status).or_default() += 1;
        }

        // BTreeMap iteration is alphabetical; the stable sort keeps that for ties.
        let mut top_root_causes: Vec<CauseCount> = causes
            .into_iter()
            .map(|(cause, count)| CauseCount {
                cause: cause.to_string(),
                count,
            })
            .collect();
        top_root_causes.sort_by(|a, b| b.count.cmp(&a.count));
        top_root_causes.truncate(TOP_CAUSES);

        Some(Self {
            period,
            total_failures: selected.len(),
            mean_repair_hours: total_downtime_hours / selected.len() as f64,
            total_downtime_hours,
            total_repair_cost: sorted_sum(&costs),
            top_root_causes,
            by_status,
        })
    }
}

/// Failure count of one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFailureCount {
    /// The asset
    pub asset_id: AssetId,
    /// Asset name
    pub name: String,
    /// Failures on record
    pub failures: usize,
}

/// Fleet-wide record totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    /// Number of assets
    pub total_assets: usize,
    /// Number of failures
    pub total_failures: usize,
    /// Number of work orders
    pub total_work_orders: usize,
    /// Failures per asset, most failures first
    pub failures_per_asset: Vec<AssetFailureCount>,
}

impl Overview {
    /// Builds the overview. Every asset is listed, including those that never failed.
    pub fn compute(assets: &[Asset], failures: &[Failure], orders: &[WorkOrder]) -> Self {
        let mut counts: BTreeMap<AssetId, usize> = BTreeMap::new();
        for failure in failures {
            *counts.entry(failure.asset_id).or_default() += 1;
        }

        let mut failures_per_asset: Vec<AssetFailureCount> = assets
            .iter()
            .map(|asset| AssetFailureCount {
                asset_id: asset.id,
                name: asset.name.clone(),
                failures: counts.get(&asset.id).copied().unwrap_or(0),
            })
            .collect();
        failures_per_asset.sort_by(|a, b| {
            b.failures
                .cmp(&a.failures)
                .then_with(|| a.asset_id.cmp(&b.asset_id))
        });

        Self {
            total_assets: assets.len(),
            total_failures: failures.len(),
            total_work_orders: orders.len(),
            failures_per_asset,
        }
    }
}
