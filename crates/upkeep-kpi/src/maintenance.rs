//! Work-order KPIs and the single-asset detail view.

use chrono::TimeDelta;
use serde::Serialize;
use upkeep_core::{AssetId, Failure, WorkOrder, WorkOrderKind, WorkOrderStatus};

use crate::aggregator::{KpiOptions, counted};
use crate::error::KpiError;
use crate::metrics::{availability, mtbf_hours, mttr_hours, sorted_sum};

/// Share of preventive work orders closed no later than one day after their
/// scheduled date, as a percentage.
///
/// Returns `None` when there are no preventive orders. Orders without a
/// scheduled date or end date count as late.
pub fn preventive_compliance(orders: &[WorkOrder]) -> Option<f64> {
    let preventive: Vec<&WorkOrder> = orders
        .iter()
        .filter(|o| o.kind == WorkOrderKind::Preventive)
        .collect();
    if preventive.is_empty() {
        return None;
    }
    let on_time = preventive.iter().filter(|o| closed_on_time(o)).count();
    Some(on_time as f64 / preventive.len() as f64 * 100.0)
}

fn closed_on_time(order: &WorkOrder) -> bool {
    if order.status != WorkOrderStatus::Closed {
        return false;
    }
    match (order.scheduled_for, order.ended_at) {
        (Some(scheduled), Some(ended)) => ended <= scheduled + TimeDelta::days(1),
        _ => false,
    }
}

/// Sum of the recorded costs of the given work orders.
pub fn maintenance_cost(orders: &[WorkOrder]) -> f64 {
    let costs: Vec<f64> = orders.iter().filter_map(|o| o.cost).collect();
    sorted_sum(&costs)
}

/// Everything known about one asset's reliability and maintenance.
///
/// Unlike [`AssetKpis`](crate::AssetKpis), each metric is optional so a view
/// can show MTTR for an asset that has only failed once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetail {
    /// The asset
    pub asset_id: AssetId,
    /// All failures on record
    pub failures_total: usize,
    /// Failures counted under the options in effect
    pub failures_counted: usize,
    /// Intervals behind the MTBF
    pub intervals: usize,
    /// Mean time between failures, hours
    pub mtbf_hours: Option<f64>,
    /// Mean time to repair, hours
    pub mttr_hours: Option<f64>,
    /// Availability
    pub availability: Option<f64>,
    /// Why the asset is excluded from the KPI report, if it is
    pub excluded: Option<KpiError>,
    /// Work orders on record
    pub work_orders: usize,
    /// Work orders not yet closed
    pub open_work_orders: usize,
    /// Preventive compliance percentage
    pub preventive_compliance: Option<f64>,
    /// Total maintenance cost
    pub maintenance_cost: f64,
}

impl AssetDetail {
    /// Builds the detail view. Records belonging to other assets are ignored.
    pub fn compute(
        asset_id: AssetId,
        failures: &[Failure],
        orders: &[WorkOrder],
        options: &KpiOptions,
    ) -> Self {
        let own: Vec<&Failure> = failures.iter().filter(|f| f.asset_id == asset_id).collect();
        let counted = counted(&own, options);
        let timestamps: Vec<_> = counted.iter().map(|f| f.occurred_at).collect();
        let downtimes: Vec<f64> = counted.iter().map(|f| f.downtime_hours).collect();

        let mtbf = mtbf_hours(&timestamps);
        let mttr = mttr_hours(&downtimes);
        let avail = match (&mtbf, &mttr) {
            (Ok(m), Ok(r)) => availability(m.mean_hours, *r),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };

        let orders: Vec<WorkOrder> = orders
            .iter()
            .filter(|o| o.asset_id == asset_id)
            .cloned()
            .collect();

        Self {
            asset_id,
            failures_total: own.len(),
            failures_counted: counted.len(),
            intervals: mtbf.as_ref().map(|m| m.intervals).unwrap_or(0),
            mtbf_hours: mtbf.as_ref().ok().map(|m| m.mean_hours),
            mttr_hours: mttr.as_ref().ok().copied(),
            availability: avail.as_ref().ok().copied(),
            excluded: avail.err(),
            work_orders: orders.len(),
            open_work_orders: orders
                .iter()
                .filter(|o| o.status != WorkOrderStatus::Closed)
                .count(),
            preventive_compliance: preventive_compliance(&orders),
            maintenance_cost: maintenance_cost(&orders),
        }
    }
}
