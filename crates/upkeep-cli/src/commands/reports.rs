//! `upkeep kpi`, `upkeep stats` and `upkeep overview`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use upkeep_core::util::time::format_date;
use upkeep_core::{Asset, AssetId, EntityKind, FailureStatus};
use upkeep_kpi::{
    AssetDetail, FailureStatistics, KpiAggregator, KpiOptions, KpiReport, Overview, Period,
};
use upkeep_store::{FailureFilter, RecordStore};

use crate::cli::{KpiArgs, OutputFormat, StatsArgs};
use crate::error::Result;
use crate::output::{Table, emit, hours, optional_hours, optional_percent, percent};

// ============================================================================
// kpi
// ============================================================================

/// Effective KPI options: command-line flags over configured defaults.
pub fn effective_options(args: &KpiArgs, defaults: &KpiOptions) -> KpiOptions {
    KpiOptions {
        resolved_only: defaults.resolved_only || args.resolved_only,
        fleet_policy: args.policy.unwrap_or(defaults.fleet_policy),
    }
}

/// Per-asset KPI report, or the detail of one asset with `--asset`.
pub async fn kpi(
    store: &dyn RecordStore,
    args: &KpiArgs,
    defaults: &KpiOptions,
    format: OutputFormat,
) -> Result<String> {
    let options = effective_options(args, defaults);
    tracing::debug!(
        resolved_only = options.resolved_only,
        policy = %options.fleet_policy,
        "Computing KPIs"
    );

    match args.asset {
        Some(id) => asset_detail(store, AssetId::new(id), &options, format).await,
        None => fleet_report(store, &options, format).await,
    }
}

async fn fleet_report(
    store: &dyn RecordStore,
    options: &KpiOptions,
    format: OutputFormat,
) -> Result<String> {
    let assets = store.list_assets().await?;
    let failures = store.list_failures(&FailureFilter::all()).await?;
    let report =
        KpiAggregator::new(*options).aggregate_assets(assets.iter().map(|a| a.id), &failures);
    let names = asset_names(&assets);
    emit(format, &report, |r| report_text(r, &names))
}

fn asset_names(assets: &[Asset]) -> BTreeMap<AssetId, &str> {
    assets.iter().map(|a| (a.id, a.name.as_str())).collect()
}

fn name_of<'a>(names: &BTreeMap<AssetId, &'a str>, id: &AssetId) -> &'a str {
    names.get(id).copied().unwrap_or("")
}

fn report_text(report: &KpiReport, names: &BTreeMap<AssetId, &str>) -> String {
    let mut table = Table::new([
        "ASSET",
        "NAME",
        "FAILURES",
        "MTBF (h)",
        "MTTR (h)",
        "AVAILABILITY",
    ]);
    for (id, kpis) in &report.assets {
        table.row([
            id.to_string(),
            name_of(names, id).to_string(),
            kpis.failures.to_string(),
            hours(kpis.mtbf_hours),
            hours(kpis.mttr_hours),
            percent(kpis.availability),
        ]);
    }

    let mut out = if table.is_empty() {
        "No asset has enough failure history for KPIs\n".to_string()
    } else {
        table.render()
    };

    if !report.insufficient.is_empty() {
        out.push_str("\nExcluded:\n");
        for (id, reason) in &report.insufficient {
            let _ = writeln!(out, "  {id}  {}  {reason}", name_of(names, id));
        }
    }

    out.push('\n');
    match &report.fleet {
        Some(fleet) => {
            let _ = writeln!(
                out,
                "Fleet ({}, {} assets): MTBF {} h, MTTR {} h, Availability {}",
                fleet.policy,
                fleet.assets,
                hours(fleet.mtbf_hours),
                hours(fleet.mttr_hours),
                percent(fleet.availability)
            );
        }
        None => out.push_str("Fleet: not enough data\n"),
    }
    out
}

/// One asset with its detail view.
#[derive(Debug, Serialize)]
pub struct AssetReport {
    /// The asset record
    pub asset: Asset,
    /// Reliability and maintenance figures
    pub kpis: AssetDetail,
}

async fn asset_detail(
    store: &dyn RecordStore,
    id: AssetId,
    options: &KpiOptions,
    format: OutputFormat,
) -> Result<String> {
    let asset = store
        .get_asset(id)
        .await?
        .ok_or_else(|| upkeep_core::Error::not_found(EntityKind::Asset, id.get()))?;
    let failures = store.list_failures(&FailureFilter::all().for_asset(id)).await?;
    let orders = store.list_work_orders(Some(id)).await?;
    let kpis = AssetDetail::compute(id, &failures, &orders, options);

    emit(format, &AssetReport { asset, kpis }, detail_text)
}

fn detail_text(report: &AssetReport) -> String {
    let AssetReport { asset, kpis } = report;
    let mut out = format!(
        "Asset {}: {} ({})\n\n",
        asset.id, asset.name, asset.criticality
    );

    let mut rows: Vec<(&str, String)> = vec![
        (
            "Failures",
            format!("{} ({} counted)", kpis.failures_total, kpis.failures_counted),
        ),
        ("MTBF", with_unit(optional_hours(kpis.mtbf_hours), "h")),
        ("MTTR", with_unit(optional_hours(kpis.mttr_hours), "h")),
        ("Availability", optional_percent(kpis.availability)),
    ];
    if let Some(reason) = &kpis.excluded {
        rows.push(("Excluded", reason.to_string()));
    }
    rows.push((
        "Work orders",
        format!("{} ({} open)", kpis.work_orders, kpis.open_work_orders),
    ));
    rows.push((
        "Preventive compliance",
        kpis.preventive_compliance
            .map_or_else(|| "-".to_string(), |pct| format!("{pct:.2}%")),
    ));
    rows.push(("Maintenance cost", format!("{:.2}", kpis.maintenance_cost)));

    for (label, value) in rows {
        let _ = writeln!(out, "{label:<23}{value}");
    }
    out
}

fn with_unit(value: String, unit: &str) -> String {
    if value == "-" {
        value
    } else {
        format!("{value} {unit}")
    }
}

// ============================================================================
// stats
// ============================================================================

/// Failure statistics over `--from`/`--to`, optionally for one asset.
pub async fn stats(
    store: &dyn RecordStore,
    args: &StatsArgs,
    format: OutputFormat,
) -> Result<String> {
    let period = Period::from_dates(args.from, args.to);
    let mut filter = FailureFilter::all().between(period.from, period.to);
    if let Some(id) = args.asset {
        let id = AssetId::new(id);
        if store.get_asset(id).await?.is_none() {
            return Err(upkeep_core::Error::not_found(EntityKind::Asset, id.get()).into());
        }
        filter = filter.for_asset(id);
    }

    let failures = store.list_failures(&filter).await?;
    let statistics = FailureStatistics::compute(&failures, period);
    emit(format, &statistics, |s| match s {
        Some(s) => stats_text(s),
        None => "No failures in the selected period\n".to_string(),
    })
}

fn describe_period(period: &Period) -> String {
    match (period.from, period.to) {
        (None, None) => "all time".to_string(),
        (from, to) => format!(
            "{} .. {}",
            from.map_or_else(|| "start".to_string(), |at| format_date(&at.date())),
            to.map_or_else(|| "now".to_string(), |at| format_date(&at.date())),
        ),
    }
}

fn stats_text(stats: &FailureStatistics) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Period", describe_period(&stats.period)),
        ("Failures", stats.total_failures.to_string()),
        ("Mean repair time", format!("{} h", hours(stats.mean_repair_hours))),
        ("Total downtime", format!("{} h", hours(stats.total_downtime_hours))),
        ("Total repair cost", format!("{:.2}", stats.total_repair_cost)),
    ] {
        let _ = writeln!(out, "{label:<19}{value}");
    }

    let by_status: Vec<String> = FailureStatus::ALL
        .iter()
        .filter_map(|status| {
            stats
                .by_status
                .get(status)
                .map(|count| format!("{status} {count}"))
        })
        .collect();
    let _ = writeln!(out, "{:<19}{}", "By status", by_status.join(", "));

    let mut causes = Table::new(["ROOT CAUSE", "FAILURES"]);
    for cause in &stats.top_root_causes {
        causes.row([cause.cause.clone(), cause.count.to_string()]);
    }
    out.push('\n');
    out.push_str(&causes.render());
    out
}

// ============================================================================
// overview
// ============================================================================

/// Record totals and failures per asset.
pub async fn overview(store: &dyn RecordStore, format: OutputFormat) -> Result<String> {
    let assets = store.list_assets().await?;
    let failures = store.list_failures(&FailureFilter::all()).await?;
    let orders = store.list_work_orders(None).await?;
    let overview = Overview::compute(&assets, &failures, &orders);
    emit(format, &overview, overview_text)
}

fn overview_text(overview: &Overview) -> String {
    let mut out = format!(
        "Assets       {}\nFailures     {}\nWork orders  {}\n\n",
        overview.total_assets, overview.total_failures, overview.total_work_orders
    );
    let mut table = Table::new(["ASSET", "NAME", "FAILURES"]);
    for entry in &overview.failures_per_asset {
        table.row([
            entry.asset_id.to_string(),
            entry.name.clone(),
            entry.failures.to_string(),
        ]);
    }
    out.push_str(&table.render());
    out
}
