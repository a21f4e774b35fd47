//! Bulk transfer between CSV datasets and a record store.

use std::fmt;

use serde::Serialize;

use crate::backend::RecordStore;
use crate::error::Result;
use crate::tabular::Dataset;
use crate::types::FailureFilter;

/// Outcome counts for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// Records written to the store
    pub inserted: usize,
    /// Records rejected by the store
    pub rejected: usize,
}

impl TableCounts {
    fn record(&mut self, result: &Result<()>) {
        match result {
            Ok(()) => self.inserted += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

/// Outcome of [`import_dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Assets
    pub assets: TableCounts,
    /// Failures
    pub failures: TableCounts,
    /// Work orders
    pub work_orders: TableCounts,
}

impl ImportSummary {
    /// Total records rejected across all tables.
    pub fn rejected(&self) -> usize {
        self.assets.rejected + self.failures.rejected + self.work_orders.rejected
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assets: {} imported, {} rejected; failures: {} imported, {} rejected; \
             work orders: {} imported, {} rejected",
            self.assets.inserted,
            self.assets.rejected,
            self.failures.inserted,
            self.failures.rejected,
            self.work_orders.inserted,
            self.work_orders.rejected,
        )
    }
}

/// Keeps going on record-level errors, stops on backend errors.
fn tolerate(kind: &str, id: impl fmt::Display, result: Result<()>) -> Result<Result<()>> {
    match result {
        Err(err) if err.is_data_error() => {
            tracing::warn!(kind, id = %id, error = %err, "Skipped record during import");
            Ok(Err(err))
        }
        Err(err) => Err(err),
        Ok(()) => Ok(Ok(())),
    }
}

/// Inserts a dataset into `store`: assets first, then failures and work orders.
///
/// Records the store rejects (duplicates, dangling references, invalid
/// values) are logged and counted; the import carries on. A backend failure
/// aborts it.
pub async fn import_dataset(store: &dyn RecordStore, dataset: &Dataset) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for asset in &dataset.assets {
        let result = tolerate("asset", asset.id, store.insert_asset(asset).await)?;
        summary.assets.record(&result);
    }
    for failure in &dataset.failures {
        let result = tolerate("failure", failure.id, store.insert_failure(failure).await)?;
        summary.failures.record(&result);
    }
    for order in &dataset.work_orders {
        let result = tolerate("work order", order.id, store.insert_work_order(order).await)?;
        summary.work_orders.record(&result);
    }

    tracing::info!(backend = store.name(), %summary, "Import finished");
    Ok(summary)
}

/// Reads every record out of `store`.
pub async fn snapshot(store: &dyn RecordStore) -> Result<Dataset> {
    Ok(Dataset {
        assets: store.list_assets().await?,
        failures: store.list_failures(&FailureFilter::all()).await?,
        work_orders: store.list_work_orders(None).await?,
    })
}
