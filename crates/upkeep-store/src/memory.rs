//! In-memory record store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use upkeep_core::{
    Asset, AssetId, EntityKind, Error as CoreError, Failure, FailureId, WorkOrder, WorkOrderId,
};

use crate::backend::RecordStore;
use crate::error::Result;
use crate::types::FailureFilter;

#[derive(Debug, Default)]
struct Tables {
    assets: BTreeMap<AssetId, Asset>,
    failures: BTreeMap<FailureId, Failure>,
    work_orders: BTreeMap<WorkOrderId, WorkOrder>,
}

impl Tables {
    fn require_asset(&self, kind: EntityKind, id: u64, asset_id: AssetId) -> Result<()> {
        if self.assets.contains_key(&asset_id) {
            Ok(())
        } else {
            Err(CoreError::dangling(kind, id, asset_id.get()).into())
        }
    }
}

/// Record store backed by ordered maps behind a single lock.
///
/// All three tables share one `RwLock`, so the referential check and the
/// write of an insert happen under the same guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_asset(&self, asset: &Asset) -> Result<()> {
        asset.validate()?;
        let mut tables = self.tables.write().await;
        if tables.assets.contains_key(&asset.id) {
            return Err(CoreError::duplicate(EntityKind::Asset, asset.id.get()).into());
        }
        tables.assets.insert(asset.id, asset.clone());
        Ok(())
    }

    async fn update_asset(&self, asset: &Asset) -> Result<()> {
        asset.validate()?;
        let mut tables = self.tables.write().await;
        match tables.assets.get_mut(&asset.id) {
            Some(existing) => {
                *existing = asset.clone();
                Ok(())
            }
            None => Err(CoreError::not_found(EntityKind::Asset, asset.id.get()).into()),
        }
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>> {
        Ok(self.tables.read().await.assets.get(&id).cloned())
    }

    async fn list_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.tables.read().await.assets.values().cloned().collect())
    }

    async fn insert_failure(&self, failure: &Failure) -> Result<()> {
        failure.validate()?;
        let mut tables = self.tables.write().await;
        tables.require_asset(EntityKind::Failure, failure.id.get(), failure.asset_id)?;
        if tables.failures.contains_key(&failure.id) {
            return Err(CoreError::duplicate(EntityKind::Failure, failure.id.get()).into());
        }
        tables.failures.insert(failure.id, failure.clone());
        Ok(())
    }

    async fn correct_failure(&self, failure: &Failure) -> Result<()> {
        failure.validate()?;
        let mut tables = self.tables.write().await;
        if !tables.failures.contains_key(&failure.id) {
            return Err(CoreError::not_found(EntityKind::Failure, failure.id.get()).into());
        }
        tables.require_asset(EntityKind::Failure, failure.id.get(), failure.asset_id)?;
        tables.failures.insert(failure.id, failure.clone());
        Ok(())
    }

    async fn delete_failure(&self, id: FailureId) -> Result<bool> {
        Ok(self.tables.write().await.failures.remove(&id).is_some())
    }

    async fn get_failure(&self, id: FailureId) -> Result<Option<Failure>> {
        Ok(self.tables.read().await.failures.get(&id).cloned())
    }

    async fn list_failures(&self, filter: &FailureFilter) -> Result<Vec<Failure>> {
        let tables = self.tables.read().await;
        let mut failures: Vec<Failure> = tables
            .failures
            .values()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        failures.sort_by(|a, b| (a.occurred_at, a.id).cmp(&(b.occurred_at, b.id)));
        Ok(failures)
    }

    async fn insert_work_order(&self, order: &WorkOrder) -> Result<()> {
        order.validate()?;
        let mut tables = self.tables.write().await;
        tables.require_asset(EntityKind::WorkOrder, order.id.get(), order.asset_id)?;
        if tables.work_orders.contains_key(&order.id) {
            return Err(CoreError::duplicate(EntityKind::WorkOrder, order.id.get()).into());
        }
        tables.work_orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update_work_order(&self, order: &WorkOrder) -> Result<()> {
        order.validate()?;
        let mut tables = self.tables.write().await;
        if !tables.work_orders.contains_key(&order.id) {
            return Err(CoreError::not_found(EntityKind::WorkOrder, order.id.get()).into());
        }
        tables.require_asset(EntityKind::WorkOrder, order.id.get(), order.asset_id)?;
        tables.work_orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_work_order(&self, id: WorkOrderId) -> Result<Option<WorkOrder>> {
        Ok(self.tables.read().await.work_orders.get(&id).cloned())
    }

    async fn list_work_orders(&self, asset_id: Option<AssetId>) -> Result<Vec<WorkOrder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .work_orders
            .values()
            .filter(|o| asset_id.is_none_or(|id| o.asset_id == id))
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
