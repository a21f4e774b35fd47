//! `upkeep import` and `upkeep export`.

use std::path::Path;

use serde::Serialize;
use upkeep_store::{ImportSummary, RecordStore, import_dataset, load_dir, snapshot, write_dir};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{Table, emit};

/// Load a CSV directory and import it into `store`.
///
/// Bad rows and references to unknown assets abort the load before
/// anything is written. Records the store already holds are counted as
/// rejected and the rest are imported.
pub async fn import(store: &dyn RecordStore, dir: &Path, format: OutputFormat) -> Result<String> {
    let dataset = load_dir(dir)?;
    let summary = import_dataset(store, &dataset).await?;
    if summary.rejected() > 0 {
        tracing::warn!(rejected = summary.rejected(), "Some records were not imported");
    }
    emit(format, &summary, summary_table)
}

fn summary_table(summary: &ImportSummary) -> String {
    let mut table = Table::new(["TABLE", "IMPORTED", "REJECTED"]);
    for (name, counts) in [
        ("assets", summary.assets),
        ("failures", summary.failures),
        ("work orders", summary.work_orders),
    ] {
        table.row([
            name.to_string(),
            counts.inserted.to_string(),
            counts.rejected.to_string(),
        ]);
    }
    table.render()
}

/// Counts written by [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Assets written
    pub assets: usize,
    /// Failures written
    pub failures: usize,
    /// Work orders written
    pub work_orders: usize,
}

/// Write the store's contents to `dir` as CSV.
pub async fn export(store: &dyn RecordStore, dir: &Path, format: OutputFormat) -> Result<String> {
    let dataset = snapshot(store).await?;
    write_dir(dir, &dataset)?;
    tracing::info!(dir = %dir.display(), records = dataset.len(), "Exported dataset");

    let summary = ExportSummary {
        assets: dataset.assets.len(),
        failures: dataset.failures.len(),
        work_orders: dataset.work_orders.len(),
    };
    emit(format, &summary, |s| {
        format!(
            "Wrote {} assets, {} failures, {} work orders to {}\n",
            s.assets,
            s.failures,
            s.work_orders,
            dir.display()
        )
    })
}
