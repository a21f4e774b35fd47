//! Upkeep maintenance KPIs, umbrella crate.
//!
//! This crate re-exports the Upkeep components for convenience.
//! Use feature flags to pull in storage and the command-line layer.

#![doc = include_str!("../README.md")]

pub use upkeep_core as core;
pub use upkeep_kpi as kpi;

#[cfg(feature = "store")]
pub use upkeep_store as store;

#[cfg(feature = "cli")]
pub use upkeep_cli as cli;

/// Types most callers need.
pub mod prelude {
    pub use upkeep_core::{
        Asset, AssetId, Criticality, Failure, FailureId, FailureStatus, WorkOrder, WorkOrderId,
        WorkOrderKind, WorkOrderStatus,
    };
    pub use upkeep_kpi::{FleetPolicy, KpiAggregator, KpiOptions, KpiReport};

    #[cfg(feature = "store")]
    pub use upkeep_store::{MemoryStore, RecordStore, SqliteStore, StoreConfig, create_store};
}
