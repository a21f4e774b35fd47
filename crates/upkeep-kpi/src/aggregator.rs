//! Per-asset and fleet KPI aggregation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use upkeep_core::{AssetId, Failure};

use crate::error::{KpiError, Metric};
use crate::metrics::{availability, mtbf_hours, mttr_hours, sorted_sum};

/// How the fleet-wide figure is derived from per-asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FleetPolicy {
    /// Pool within-asset intervals and all downtimes, then apply the formulas once.
    #[default]
    Pooled,
    /// Average the KPIs of the assets that have all three values.
    MeanOfAssets,
}

impl FleetPolicy {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FleetPolicy::Pooled => "pooled",
            FleetPolicy::MeanOfAssets => "mean-of-assets",
        }
    }
}

impl fmt::Display for FleetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FleetPolicy {
    type Err = upkeep_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pooled" => Ok(FleetPolicy::Pooled),
            "mean-of-assets" | "mean" => Ok(FleetPolicy::MeanOfAssets),
            other => Err(upkeep_core::Error::validation_field(
                "fleet_policy",
                format!("unknown fleet policy '{other}' (expected pooled or mean-of-assets)"),
            )),
        }
    }
}

/// Options controlling which failures count and how the fleet figure is built.
///
/// Doubles as the `[kpi]` configuration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiOptions {
    /// Count only `Resolved`/`Closed` failures.
    pub resolved_only: bool,
    /// Fleet aggregation policy.
    pub fleet_policy: FleetPolicy,
}

/// MTBF, MTTR and Availability for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetKpis {
    /// The asset
    pub asset_id: AssetId,
    /// Failures that were counted
    pub failures: usize,
    /// Intervals the MTBF is averaged over
    pub intervals: usize,
    /// Mean time between failures, hours
    pub mtbf_hours: f64,
    /// Mean time to repair, hours
    pub mttr_hours: f64,
    /// `mtbf / (mtbf + mttr)`
    pub availability: f64,
}

/// Fleet-wide KPIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetKpis {
    /// Policy used to compute these values
    pub policy: FleetPolicy,
    /// Number of assets that contributed
    pub assets: usize,
    /// Fleet MTBF, hours
    pub mtbf_hours: f64,
    /// Fleet MTTR, hours
    pub mttr_hours: f64,
    /// Fleet availability
    pub availability: f64,
}

/// Result of aggregating failures across assets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct KpiReport {
    /// Assets with all three KPIs defined
    pub assets: BTreeMap<AssetId, AssetKpis>,
    /// Assets excluded, with the reason
    pub insufficient: BTreeMap<AssetId, KpiError>,
    /// Fleet figure, when one can be computed
    pub fleet: Option<FleetKpis>,
}

impl KpiReport {
    /// KPIs for one asset, if it had enough data.
    pub fn get(&self, asset_id: AssetId) -> Option<&AssetKpis> {
        self.assets.get(&asset_id)
    }

    /// Whether no asset was seen at all.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.insufficient.is_empty()
    }
}

/// Computes the KPIs of a single asset.
///
/// The asset is the one of the first record; records of other assets are
/// ignored. Fails with the first metric that cannot be computed, MTBF first.
pub fn asset_kpis(failures: &[Failure], options: &KpiOptions) -> Result<AssetKpis, KpiError> {
    let Some(first) = failures.first() else {
        return Err(KpiError::insufficient(Metric::Mtbf, 2, 0));
    };
    let refs: Vec<&Failure> = failures
        .iter()
        .filter(|f| f.asset_id == first.asset_id)
        .collect();
    compute(first.asset_id, &refs, options)
}

pub(crate) fn counted<'a>(failures: &[&'a Failure], options: &KpiOptions) -> Vec<&'a Failure> {
    failures
        .iter()
        .copied()
        .filter(|f| !options.resolved_only || f.status.is_resolved())
        .collect()
}

fn compute(
    asset_id: AssetId,
    failures: &[&Failure],
    options: &KpiOptions,
) -> Result<AssetKpis, KpiError> {
    let counted = counted(failures, options);
    let timestamps: Vec<_> = counted.iter().map(|f| f.occurred_at).collect();
    let downtimes: Vec<f64> = counted.iter().map(|f| f.downtime_hours).collect();

    let mtbf = mtbf_hours(&timestamps)?;
    let mttr = mttr_hours(&downtimes)?;
    let availability = availability(mtbf.mean_hours, mttr)?;

    Ok(AssetKpis {
        asset_id,
        failures: counted.len(),
        intervals: mtbf.intervals,
        mtbf_hours: mtbf.mean_hours,
        mttr_hours: mttr,
        availability,
    })
}

/// Partitions failures by asset and computes per-asset and fleet KPIs.
#[derive(Debug, Clone, Default)]
pub struct KpiAggregator {
    options: KpiOptions,
}

impl KpiAggregator {
    /// Creates an aggregator with the given options.
    pub fn new(options: KpiOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &KpiOptions {
        &self.options
    }

    /// Aggregates the given failures. Only assets that appear in `failures`
    /// are reported.
    pub fn aggregate(&self, failures: &[Failure]) -> KpiReport {
        self.aggregate_assets(std::iter::empty(), failures)
    }

    /// Aggregates the given failures, additionally listing every asset in
    /// `assets` so assets with no failures show up as insufficient.
    pub fn aggregate_assets<I>(&self, assets: I, failures: &[Failure]) -> KpiReport
    where
        I: IntoIterator<Item = AssetId>,
    {
        let mut by_asset: BTreeMap<AssetId, Vec<&Failure>> =
            assets.into_iter().map(|id| (id, Vec::new())).collect();
        for failure in failures {
            by_asset.entry(failure.asset_id).or_default().push(failure);
        }

        let mut report = KpiReport::default();
        for (asset_id, group) in &by_asset {
            match compute(*asset_id, group, &self.options) {
                Ok(kpis) => {
                    report.assets.insert(*asset_id, kpis);
                }
                Err(err) => {
                    tracing::debug!(asset_id = %asset_id, reason = %err, "Asset excluded from KPI report");
                    report.insufficient.insert(*asset_id, err);
                }
            }
        }

        report.fleet = match self.options.fleet_policy {
            FleetPolicy::Pooled => self.pooled(&by_asset),
            FleetPolicy::MeanOfAssets => mean_of_assets(&report.assets),
        };
        report
    }

    fn pooled(&self, by_asset: &BTreeMap<AssetId, Vec<&Failure>>) -> Option<FleetKpis> {
        let mut total_hours = 0.0;
        let mut intervals = 0usize;
        let mut downtimes = Vec::new();
        let mut contributing = 0usize;

        for group in by_asset.values() {
            let counted = counted(group, &self.options);
            if counted.is_empty() {
                continue;
            }
            contributing += 1;
            downtimes.extend(counted.iter().map(|f| f.downtime_hours));
            let timestamps: Vec<_> = counted.iter().map(|f| f.occurred_at).collect();
            if let Ok(stats) = mtbf_hours(&timestamps) {
                total_hours += stats.total_hours;
                intervals += stats.intervals;
            }
        }

        if intervals == 0 {
            return None;
        }
        let mtbf = total_hours / intervals as f64;
        let mttr = mttr_hours(&downtimes).ok()?;
        let availability = availability(mtbf, mttr).ok()?;
        Some(FleetKpis {
            policy: FleetPolicy::Pooled,
            assets: contributing,
            mtbf_hours: mtbf,
            mttr_hours: mttr,
            availability,
        })
    }
}

fn mean_of_assets(assets: &BTreeMap<AssetId, AssetKpis>) -> Option<FleetKpis> {
    if assets.is_empty() {
        return None;
    }
    let n = assets.len() as f64;
    let mean = |select: fn(&AssetKpis) -> f64| {
        let values: Vec<f64> = assets.values().map(select).collect();
        sorted_sum(&values) / n
    };
    Some(FleetKpis {
        policy: FleetPolicy::MeanOfAssets,
        assets: assets.len(),
        mtbf_hours: mean(|k| k.mtbf_hours),
        mttr_hours: mean(|k| k.mttr_hours),
        availability: mean(|k| k.availability),
    })
}
