//! Upkeep Core: shared types, validation, errors, and configuration.
//!
//! This crate provides the foundational types used across all Upkeep crates.
//! It has no internal Upkeep dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`types`]: Asset, failure, and work-order records
//! - [`util`]: Timestamp and numeric field parsing
//! - [`traits`]: The [`ConfigManager`](traits::ConfigManager) trait

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod types;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigManager;
pub use types::{
    Asset, AssetId, Criticality, EntityKind, Failure, FailureId, FailureStatus, WorkOrder,
    WorkOrderId, WorkOrderKind, WorkOrderStatus,
};
