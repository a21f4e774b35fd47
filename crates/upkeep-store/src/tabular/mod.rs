//! CSV tables: `activos.csv`, `fallas.csv`, `ordenes_trabajo.csv`.
//!
//! Column names are the Spanish ones used by the maintenance spreadsheets
//! this data comes from. Optional columns may be absent from the header;
//! empty cells in optional columns mean "not recorded".

mod read;
mod write;

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use upkeep_core::{Asset, AssetId, EntityKind, Error as CoreError, Failure, WorkOrder};

use crate::error::Result;

pub use read::{read_assets, read_failures, read_work_orders};
pub use write::{
    ASSET_HEADER, FAILURE_HEADER, WORK_ORDER_HEADER, write_assets, write_failures,
    write_work_orders,
};

/// File name of the assets table.
pub const ASSETS_FILE: &str = "activos.csv";
/// File name of the failures table.
pub const FAILURES_FILE: &str = "fallas.csv";
/// File name of the work-orders table.
pub const WORK_ORDERS_FILE: &str = "ordenes_trabajo.csv";

/// The three tables, validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    /// Assets
    pub assets: Vec<Asset>,
    /// Failures
    pub failures: Vec<Failure>,
    /// Work orders
    pub work_orders: Vec<WorkOrder>,
}

impl Dataset {
    /// Checks that every failure and work order references a known asset.
    ///
    /// Returns the first dangling reference as `ReferentialIntegrity`.
    pub fn check_references(&self) -> Result<()> {
        let known: BTreeSet<AssetId> = self.assets.iter().map(|a| a.id).collect();
        if let Some(f) = self.failures.iter().find(|f| !known.contains(&f.asset_id)) {
            return Err(CoreError::dangling(EntityKind::Failure, f.id.get(), f.asset_id.get()).into());
        }
        if let Some(o) = self.work_orders.iter().find(|o| !known.contains(&o.asset_id)) {
            return Err(
                CoreError::dangling(EntityKind::WorkOrder, o.id.get(), o.asset_id.get()).into(),
            );
        }
        Ok(())
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.assets.len() + self.failures.len() + self.work_orders.len()
    }

    /// Whether all three tables are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Opens `dir/name`, or returns `None` (with a warning) if it does not exist.
fn open_table(dir: &Path, name: &str) -> Result<Option<BufReader<File>>> {
    let path = dir.join(name);
    match File::open(&path) {
        Ok(file) => Ok(Some(BufReader::new(file))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "CSV table not found, treating as empty");
            Ok(None)
        }
        Err(e) => Err(CoreError::io_with_path(e, &path).into()),
    }
}

/// Loads the three tables from `dir` and checks references between them.
///
/// A missing file yields an empty table. A bad row aborts the load with an
/// `Ingest` error naming the file and line.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Dataset> {
    let dir = dir.as_ref();
    let assets = match open_table(dir, ASSETS_FILE)? {
        Some(reader) => read_assets(ASSETS_FILE, reader)?,
        None => Vec::new(),
    };
    let failures = match open_table(dir, FAILURES_FILE)? {
        Some(reader) => read_failures(FAILURES_FILE, reader)?,
        None => Vec::new(),
    };
    let work_orders = match open_table(dir, WORK_ORDERS_FILE)? {
        Some(reader) => read_work_orders(WORK_ORDERS_FILE, reader)?,
        None => Vec::new(),
    };

    let dataset = Dataset {
        assets,
        failures,
        work_orders,
    };
    dataset.check_references()?;
    tracing::info!(
        dir = %dir.display(),
        assets = dataset.assets.len(),
        failures = dataset.failures.len(),
        work_orders = dataset.work_orders.len(),
        "Loaded CSV tables"
    );
    Ok(dataset)
}

fn create_table(dir: &Path, name: &str) -> Result<File> {
    let path = dir.join(name);
    File::create(&path).map_err(|e| CoreError::io_with_path(e, &path).into())
}

/// Writes the three tables into `dir`, creating it if needed.
pub fn write_dir(dir: impl AsRef<Path>, dataset: &Dataset) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|e| CoreError::io_with_path(e, dir))?;
    write_assets(create_table(dir, ASSETS_FILE)?, &dataset.assets)?;
    write_failures(create_table(dir, FAILURES_FILE)?, &dataset.failures)?;
    write_work_orders(create_table(dir, WORK_ORDERS_FILE)?, &dataset.work_orders)?;
    tracing::info!(dir = %dir.display(), records = dataset.len(), "Wrote CSV tables");
    Ok(())
}
