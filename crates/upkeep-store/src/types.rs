//! Store configuration and query parameters.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use upkeep_core::{AssetId, Failure, FailureStatus};

/// Configuration for the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend to use: "sqlite" or "memory".
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Path of the SQLite database file.
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum pooled connections for SQLite.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_path() -> String {
    "upkeep.db".to_string()
}

fn default_max_connections() -> u32 {
    4
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl StoreConfig {
    /// An in-memory store configuration.
    pub fn memory() -> Self {
        Self {
            backend: "memory".to_string(),
            ..Self::default()
        }
    }

    /// A SQLite store at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            backend: "sqlite".to_string(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Which failures to list. All bounds are inclusive; `None` means unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureFilter {
    /// Only this asset
    pub asset_id: Option<AssetId>,
    /// Only this status
    pub status: Option<FailureStatus>,
    /// Not before
    pub from: Option<NaiveDateTime>,
    /// Not after
    pub to: Option<NaiveDateTime>,
}

impl FailureFilter {
    /// Matches every failure.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one asset.
    pub fn for_asset(mut self, asset_id: AssetId) -> Self {
        self.asset_id = Some(asset_id);
        self
    }

    /// Restricts to one status.
    pub fn with_status(mut self, status: FailureStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to an inclusive time window.
    pub fn between(mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Whether `failure` passes the filter.
    pub fn matches(&self, failure: &Failure) -> bool {
        self.asset_id.is_none_or(|id| failure.asset_id == id)
            && self.status.is_none_or(|s| failure.status == s)
            && self.from.is_none_or(|from| failure.occurred_at >= from)
            && self.to.is_none_or(|to| failure.occurred_at <= to)
    }
}
