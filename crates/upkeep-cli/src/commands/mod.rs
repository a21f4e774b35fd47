//! Command implementations.
//!
//! Every command takes an open [`RecordStore`] and returns the text to print,
//! so the binary owns stdout and tests can inspect the output directly.

pub mod data;
pub mod records;
pub mod reports;

use upkeep_kpi::KpiOptions;
use upkeep_store::RecordStore;

use crate::cli::{Command, OutputFormat};
use crate::error::Result;

/// Run a store-backed command.
///
/// `config` subcommands never reach the store and are handled by
/// [`handle_config_command`](crate::config_handlers::handle_config_command).
pub async fn run(
    command: Command,
    store: &dyn RecordStore,
    kpi: &KpiOptions,
    format: OutputFormat,
) -> Result<String> {
    match command {
        Command::Import { dir } => data::import(store, &dir, format).await,
        Command::Export { dir } => data::export(store, &dir, format).await,
        Command::Kpi(args) => reports::kpi(store, &args, kpi, format).await,
        Command::Stats(args) => reports::stats(store, &args, format).await,
        Command::Overview => reports::overview(store, format).await,
        Command::Asset { action } => records::asset(store, action, format).await,
        Command::Failure { action } => records::failure(store, action, format).await,
        Command::WorkOrder { action } => records::work_order(store, action, format).await,
        Command::Config { .. } => Err(upkeep_core::Error::config(
            "config subcommands are handled before the store is opened",
        )
        .into()),
    }
}

/// Combine a command's outcome with closing the store it ran against.
///
/// The command's own error is reported first; a close failure only surfaces
/// when the command succeeded, and is logged otherwise.
pub fn settle(result: Result<String>, closed: upkeep_store::Result<()>) -> Result<String> {
    match (result, closed) {
        (Ok(output), Ok(())) => Ok(output),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "Failed to close store");
            Err(e)
        }
    }
}

/// The next free identifier: one past the largest in use, starting at 1.
pub(crate) fn next_id<I>(ids: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    ids.into_iter().max().map_or(1, |max| max.saturating_add(1))
}
