//! Upkeep Store: where assets, failures and work orders live.
//!
//! # Modules
//!
//! - [`backend`]: the [`RecordStore`] trait and [`create_store`] factory
//! - [`memory`]: [`MemoryStore`]
//! - [`sqlite`]: [`SqliteStore`]
//! - [`tabular`]: CSV reading and writing
//! - [`import`]: bulk transfer between a [`Dataset`] and a store
//! - [`types`]: [`StoreConfig`] and [`FailureFilter`]

#![doc = include_str!("../README.md")]

pub mod backend;
pub mod error;
pub mod import;
pub mod memory;
pub mod sqlite;
pub mod tabular;
pub mod types;

pub use backend::{RecordStore, create_store};
pub use error::{Error, Result};
pub use import::{ImportSummary, TableCounts, import_dataset, snapshot};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use tabular::{Dataset, load_dir, write_dir};
pub use types::{FailureFilter, StoreConfig};
