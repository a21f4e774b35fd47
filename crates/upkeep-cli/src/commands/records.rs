//! `upkeep asset`, `upkeep failure` and `upkeep work-order`.

use chrono::{Local, NaiveDateTime};
use upkeep_core::util::numbers::format_optional_amount;
use upkeep_core::util::time::{format_date, format_optional_timestamp, format_timestamp};
use upkeep_core::{Asset, AssetId, EntityKind, Failure, FailureId, WorkOrder, WorkOrderId};
use upkeep_store::{FailureFilter, RecordStore};

use super::next_id;
use crate::cli::{
    AssetAction, FailureAction, FailureCorrection, NewAsset, NewFailure, NewWorkOrder,
    OutputFormat, WorkOrderAction,
};
use crate::error::Result;
use crate::output::{Table, emit, text};

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Blank free text is stored as absent, the same as an empty CSV cell.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Assets
// ============================================================================

/// Run an `asset` subcommand.
pub async fn asset(
    store: &dyn RecordStore,
    action: AssetAction,
    format: OutputFormat,
) -> Result<String> {
    match action {
        AssetAction::List => {
            let assets = store.list_assets().await?;
            emit(format, &assets, |assets| asset_table(assets))
        }
        AssetAction::Add(new) => {
            let asset = add_asset(store, new).await?;
            emit(format, &asset, |a| format!("Added asset {}: {}\n", a.id, a.name))
        }
    }
}

async fn add_asset(store: &dyn RecordStore, new: NewAsset) -> Result<Asset> {
    let id = match new.id {
        Some(id) => id,
        None => next_id(store.list_assets().await?.iter().map(|a| a.id.get())),
    };
    let mut asset = Asset::new(AssetId::new(id), new.name, new.criticality, new.acquired);
    asset.location = present(new.location);
    asset.owner = present(new.owner);

    store.insert_asset(&asset).await?;
    tracing::info!(asset_id = %asset.id, "Asset added");
    Ok(asset)
}

fn asset_table(assets: &[Asset]) -> String {
    let mut table = Table::new(["ID", "NAME", "CRITICALITY", "ACQUIRED", "LOCATION", "OWNER"]);
    for asset in assets {
        table.row([
            asset.id.to_string(),
            asset.name.clone(),
            asset.criticality.to_string(),
            format_date(&asset.acquired_on),
            text(asset.location.as_deref()),
            text(asset.owner.as_deref()),
        ]);
    }
    table.render()
}

// ============================================================================
// Failures
// ============================================================================

/// Run a `failure` subcommand.
pub async fn failure(
    store: &dyn RecordStore,
    action: FailureAction,
    format: OutputFormat,
) -> Result<String> {
    match action {
        FailureAction::List {
            asset,
            status,
            from,
            to,
        } => {
            let mut filter = FailureFilter::all().between(from, to);
            if let Some(id) = asset {
                filter = filter.for_asset(AssetId::new(id));
            }
            if let Some(status) = status {
                filter = filter.with_status(status);
            }
            let failures = store.list_failures(&filter).await?;
            emit(format, &failures, |failures| failure_table(failures))
        }
        FailureAction::Add(new) => {
            let failure = add_failure(store, new).await?;
            emit(format, &failure, |f| {
                format!("Recorded failure {} on asset {}\n", f.id, f.asset_id)
            })
        }
        FailureAction::Correct(correction) => {
            let failure = correct_failure(store, correction).await?;
            emit(format, &failure, |f| format!("Corrected failure {}\n", f.id))
        }
        FailureAction::Delete { id } => {
            if !store.delete_failure(FailureId::new(id)).await? {
                return Err(upkeep_core::Error::not_found(EntityKind::Failure, id).into());
            }
            tracing::info!(failure_id = id, "Failure deleted");
            emit(format, &serde_json::json!({ "deleted": id }), |_| {
                format!("Deleted failure {id}\n")
            })
        }
    }
}

async fn add_failure(store: &dyn RecordStore, new: NewFailure) -> Result<Failure> {
    let id = match new.id {
        Some(id) => id,
        None => {
            let existing = store.list_failures(&FailureFilter::all()).await?;
            next_id(existing.iter().map(|f| f.id.get()))
        }
    };
    let mut failure = Failure::new(
        FailureId::new(id),
        AssetId::new(new.asset),
        new.at,
        new.downtime,
    )
    .with_status(new.status);
    failure.root_cause = present(new.cause);
    failure.repair_cost = new.cost;
    failure.description = present(new.description);

    store.insert_failure(&failure).await?;
    tracing::info!(failure_id = %failure.id, asset_id = %failure.asset_id, "Failure recorded");
    Ok(failure)
}

async fn correct_failure(
    store: &dyn RecordStore,
    correction: FailureCorrection,
) -> Result<Failure> {
    let id = FailureId::new(correction.id);
    let mut failure = store
        .get_failure(id)
        .await?
        .ok_or_else(|| upkeep_core::Error::not_found(EntityKind::Failure, id.get()))?;

    if let Some(at) = correction.at {
        failure.occurred_at = at;
    }
    if let Some(downtime) = correction.downtime {
        failure.downtime_hours = downtime;
    }
    if let Some(status) = correction.status {
        failure.status = status;
    }
    if let Some(cause) = correction.cause {
        failure.root_cause = present(Some(cause));
    }
    if let Some(cost) = correction.cost {
        failure.repair_cost = Some(cost);
    }

    store.correct_failure(&failure).await?;
    tracing::info!(failure_id = %failure.id, "Failure corrected");
    Ok(failure)
}

fn failure_table(failures: &[Failure]) -> String {
    let mut table = Table::new([
        "ID",
        "ASSET",
        "OCCURRED",
        "DOWNTIME (h)",
        "STATUS",
        "ROOT CAUSE",
        "COST",
    ]);
    for failure in failures {
        table.row([
            failure.id.to_string(),
            failure.asset_id.to_string(),
            format_timestamp(&failure.occurred_at),
            failure.downtime_hours.to_string(),
            failure.status.to_string(),
            text(failure.root_cause.as_deref()),
            format_optional_amount(failure.repair_cost),
        ]);
    }
    table.render()
}

// ============================================================================
// Work orders
// ============================================================================

/// Run a `work-order` subcommand.
pub async fn work_order(
    store: &dyn RecordStore,
    action: WorkOrderAction,
    format: OutputFormat,
) -> Result<String> {
    match action {
        WorkOrderAction::List { asset } => {
            let orders = store.list_work_orders(asset.map(AssetId::new)).await?;
            emit(format, &orders, |orders| work_order_table(orders))
        }
        WorkOrderAction::Add(new) => {
            let order = add_work_order(store, new).await?;
            emit(format, &order, |o| {
                format!("Created {} work order {} for asset {}\n", o.kind, o.id, o.asset_id)
            })
        }
        WorkOrderAction::Start { id, at } => {
            let order = transition(store, id, |order| order.start(at.unwrap_or_else(now))).await?;
            emit(format, &order, |o| format!("Started work order {}\n", o.id))
        }
        WorkOrderAction::Close { id, at } => {
            let order = transition(store, id, |order| order.close(at.unwrap_or_else(now))).await?;
            emit(format, &order, |o| {
                format!(
                    "Closed work order {} ({} h)\n",
                    o.id,
                    format_optional_amount(o.effective_duration_hours())
                )
            })
        }
    }
}

async fn add_work_order(store: &dyn RecordStore, new: NewWorkOrder) -> Result<WorkOrder> {
    let id = match new.id {
        Some(id) => id,
        None => next_id(
            store
                .list_work_orders(None)
                .await?
                .iter()
                .map(|o| o.id.get()),
        ),
    };
    let mut order = WorkOrder::new(WorkOrderId::new(id), AssetId::new(new.asset), new.kind);
    order.scheduled_for = new.scheduled;
    order.cost = new.cost;
    order.description = present(new.description);

    store.insert_work_order(&order).await?;
    tracing::info!(work_order_id = %order.id, asset_id = %order.asset_id, "Work order created");
    Ok(order)
}

/// Load a work order, apply a lifecycle step and store the result.
async fn transition<F>(store: &dyn RecordStore, id: u64, step: F) -> Result<WorkOrder>
where
    F: FnOnce(&mut WorkOrder) -> upkeep_core::Result<()>,
{
    let mut order = store
        .get_work_order(WorkOrderId::new(id))
        .await?
        .ok_or_else(|| upkeep_core::Error::not_found(EntityKind::WorkOrder, id))?;
    step(&mut order)?;
    store.update_work_order(&order).await?;
    tracing::info!(work_order_id = id, status = %order.status, "Work order updated");
    Ok(order)
}

fn work_order_table(orders: &[WorkOrder]) -> String {
    let mut table = Table::new([
        "ID",
        "ASSET",
        "KIND",
        "STATUS",
        "SCHEDULED",
        "STARTED",
        "ENDED",
        "DURATION (h)",
        "COST",
    ]);
    for order in orders {
        table.row([
            order.id.to_string(),
            order.asset_id.to_string(),
            order.kind.to_string(),
            order.status.to_string(),
            format_optional_timestamp(order.scheduled_for.as_ref()),
            format_optional_timestamp(order.started_at.as_ref()),
            format_optional_timestamp(order.ended_at.as_ref()),
            format_optional_amount(order.effective_duration_hours()),
            format_optional_amount(order.cost),
        ]);
    }
    table.render()
}
