//! Upkeep KPI: availability metrics derived from failure and work-order records.
//!
//! All functions are pure: they read the records passed in and return values,
//! with no shared state between calls.
//!
//! # Modules
//!
//! - [`metrics`]: the MTBF, MTTR and Availability formulas
//! - [`aggregator`]: per-asset partitioning and the fleet figure
//! - [`maintenance`]: preventive compliance, maintenance cost, asset detail
//! - [`stats`]: failure statistics over a period and the fleet overview
//! - [`error`]: [`KpiError`]

#![doc = include_str!("../README.md")]

pub mod aggregator;
pub mod error;
pub mod maintenance;
pub mod metrics;
pub mod stats;

mod proptests;

pub use aggregator::{
    AssetKpis, FleetKpis, FleetPolicy, KpiAggregator, KpiOptions, KpiReport, asset_kpis,
};
pub use error::{KpiError, Metric};
pub use maintenance::{AssetDetail, maintenance_cost, preventive_compliance};
pub use metrics::{IntervalStats, availability, mtbf_hours, mttr_hours};
pub use stats::{AssetFailureCount, CauseCount, FailureStatistics, Overview, Period};
