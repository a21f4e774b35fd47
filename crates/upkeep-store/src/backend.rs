//! Record store trait and factory.
//!
//! # Backends
//!
//! - `SqliteStore`: SQLite database file through `sqlx`
//! - `MemoryStore`: ordered in-memory maps
//!
//! # Example
//!
//! ```rust,ignore
//! use upkeep_store::{create_store, FailureFilter, StoreConfig};
//!
//! let store = create_store(&StoreConfig::sqlite("plant.db")).await?;
//! let failures = store.list_failures(&FailureFilter::all()).await?;
//! store.close().await?;
//! ```

use async_trait::async_trait;
use upkeep_core::{
    Asset, AssetId, Failure, FailureId, WorkOrder, WorkOrderId,
};

use crate::error::{Error, Result};
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;
use crate::types::{FailureFilter, StoreConfig};

/// Storage for assets, failures and work orders.
///
/// Every insert checks that the referenced asset exists and that the
/// identifier is unused, atomically with the write. Readers never observe a
/// half-applied insert.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Adds a new asset.
    async fn insert_asset(&self, asset: &Asset) -> Result<()>;

    /// Replaces an existing asset (administrative edit).
    async fn update_asset(&self, asset: &Asset) -> Result<()>;

    /// Looks up an asset.
    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>>;

    /// All assets, ordered by id.
    async fn list_assets(&self) -> Result<Vec<Asset>>;

    /// Records a new failure.
    async fn insert_failure(&self, failure: &Failure) -> Result<()>;

    /// Replaces an existing failure (administrative correction).
    async fn correct_failure(&self, failure: &Failure) -> Result<()>;

    /// Removes a failure. Returns whether it existed.
    async fn delete_failure(&self, id: FailureId) -> Result<bool>;

    /// Looks up a failure.
    async fn get_failure(&self, id: FailureId) -> Result<Option<Failure>>;

    /// Failures passing `filter`, ordered by `(occurred_at, id)`.
    async fn list_failures(&self, filter: &FailureFilter) -> Result<Vec<Failure>>;

    /// Adds a new work order.
    async fn insert_work_order(&self, order: &WorkOrder) -> Result<()>;

    /// Replaces an existing work order (lifecycle changes).
    async fn update_work_order(&self, order: &WorkOrder) -> Result<()>;

    /// Looks up a work order.
    async fn get_work_order(&self, id: WorkOrderId) -> Result<Option<WorkOrder>>;

    /// Work orders, optionally for one asset, ordered by id.
    async fn list_work_orders(&self, asset_id: Option<AssetId>) -> Result<Vec<WorkOrder>>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Releases the backend's resources. The store must not be used afterwards.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Create a record store based on configuration.
///
/// # Errors
///
/// Returns [`Error::UnknownBackend`] for an unrecognised backend name, or the
/// backend's own error if it cannot be opened.
pub async fn create_store(config: &StoreConfig) -> Result<Box<dyn RecordStore>> {
    match config.backend.trim().to_lowercase().as_str() {
        "sqlite" => Ok(Box::new(SqliteStore::open(config).await?)),
        "memory" => Ok(Box::new(MemoryStore::new())),
        other => Err(Error::UnknownBackend(other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_store(&StoreConfig::memory()).await.unwrap();
        assert_eq!(store.name(), "memory");
        assert!(store.list_assets().await.unwrap().is_empty());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_create_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plant.db");
        let store = create_store(&StoreConfig::sqlite(path.to_string_lossy()))
            .await
            .unwrap();
        assert_eq!(store.name(), "sqlite");
        assert!(path.exists());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let config = StoreConfig {
            backend: "postgres".into(),
            ..StoreConfig::default()
        };
        let err = create_store(&config).await.err().unwrap();
        assert!(matches!(err, Error::UnknownBackend(ref name) if name == "postgres"));
    }
}
