//! Upkeep CLI
//!
//! Maintenance records and availability KPIs from the command line.

use anyhow::Result;
use clap::Parser;
use upkeep_cli::config_handlers::handle_config_command;
use upkeep_cli::{Cli, Command, UpkeepConfig, commands, logging};
use upkeep_core::ConfigManager;
use upkeep_store::create_store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Config { action } => {
            print!("{}", handle_config_command(cli.config.as_deref(), action)?);
            return Ok(());
        }
        command => command,
    };

    let config = UpkeepConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose);
    tracing::debug!(backend = %config.store.backend, path = %config.store.path, "Opening store");

    let store = create_store(&config.store).await?;
    let result = commands::run(command, store.as_ref(), &config.kpi, cli.format).await;
    let output = commands::settle(result, store.close().await)?;
    print!("{output}");
    Ok(())
}
