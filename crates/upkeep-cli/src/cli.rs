//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use upkeep_core::util::{numbers, time};
use upkeep_core::{Criticality, FailureStatus, WorkOrderKind};
use upkeep_kpi::FleetPolicy;

/// Upkeep - maintenance records and availability KPIs
#[derive(Parser, Debug)]
#[command(name = "upkeep")]
#[command(version)]
#[command(about = "Maintenance records and availability KPIs (MTBF, MTTR, Availability)", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import activos.csv, fallas.csv and ordenes_trabajo.csv from a directory
    Import {
        /// Directory holding the CSV files
        dir: PathBuf,
    },

    /// Write every record in the store to a directory of CSV files
    Export {
        /// Target directory (created if missing)
        dir: PathBuf,
    },

    /// MTBF, MTTR and Availability per asset, plus the fleet figure
    Kpi(KpiArgs),

    /// Failure statistics over a period
    Stats(StatsArgs),

    /// Record totals and failures per asset
    Overview,

    /// Manage assets
    Asset {
        #[command(subcommand)]
        action: AssetAction,
    },

    /// Manage failure reports
    Failure {
        #[command(subcommand)]
        action: FailureAction,
    },

    /// Manage work orders
    #[command(name = "work-order")]
    WorkOrder {
        #[command(subcommand)]
        action: WorkOrderAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `upkeep kpi`.
#[derive(Args, Debug, Clone, Default)]
pub struct KpiArgs {
    /// Show the detail of one asset instead of the fleet report
    #[arg(long)]
    pub asset: Option<u64>,

    /// Count only resolved or closed failures
    #[arg(long)]
    pub resolved_only: bool,

    /// Fleet aggregation policy (pooled, mean-of-assets)
    #[arg(long)]
    pub policy: Option<FleetPolicy>,
}

/// Arguments of `upkeep stats`.
#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// First day of the period (inclusive)
    #[arg(long, value_parser = date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day of the period (inclusive)
    #[arg(long, value_parser = date_arg)]
    pub to: Option<NaiveDate>,

    /// Only failures of this asset
    #[arg(long)]
    pub asset: Option<u64>,
}

/// `upkeep asset ...`
#[derive(Subcommand, Debug)]
pub enum AssetAction {
    /// List assets
    List,

    /// Register an asset
    Add(NewAsset),
}

/// Fields of a new asset.
#[derive(Args, Debug, Clone)]
pub struct NewAsset {
    /// Identifier (defaults to the next free one)
    #[arg(long)]
    pub id: Option<u64>,

    /// Asset name
    #[arg(long)]
    pub name: String,

    /// Criticality (high, medium, low)
    #[arg(long, default_value = "medium")]
    pub criticality: Criticality,

    /// Acquisition date
    #[arg(long, value_parser = date_arg)]
    pub acquired: NaiveDate,

    /// Physical location
    #[arg(long)]
    pub location: Option<String>,

    /// Responsible person
    #[arg(long)]
    pub owner: Option<String>,
}

/// `upkeep failure ...`
#[derive(Subcommand, Debug)]
pub enum FailureAction {
    /// List failures, oldest first
    List {
        /// Only this asset
        #[arg(long)]
        asset: Option<u64>,

        /// Only this status
        #[arg(long)]
        status: Option<FailureStatus>,

        /// Not before this timestamp
        #[arg(long, value_parser = time::parse_timestamp)]
        from: Option<NaiveDateTime>,

        /// Not after this timestamp
        #[arg(long, value_parser = time::parse_timestamp)]
        to: Option<NaiveDateTime>,
    },

    /// Report a failure
    Add(NewFailure),

    /// Correct fields of a recorded failure
    Correct(FailureCorrection),

    /// Delete a failure report
    Delete {
        /// Failure identifier
        id: u64,
    },
}

/// Fields of a new failure report.
#[derive(Args, Debug, Clone)]
pub struct NewFailure {
    /// Identifier (defaults to the next free one)
    #[arg(long)]
    pub id: Option<u64>,

    /// Asset that failed
    #[arg(long)]
    pub asset: u64,

    /// When the failure occurred
    #[arg(long, value_parser = time::parse_timestamp)]
    pub at: NaiveDateTime,

    /// Downtime in hours
    #[arg(long, value_parser = hours_arg)]
    pub downtime: f64,

    /// Status
    #[arg(long, default_value = "reported")]
    pub status: FailureStatus,

    /// Root cause
    #[arg(long)]
    pub cause: Option<String>,

    /// Repair cost
    #[arg(long, value_parser = cost_arg)]
    pub cost: Option<f64>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
}

/// Fields that can be corrected on a failure. Omitted fields keep their value.
#[derive(Args, Debug, Clone)]
pub struct FailureCorrection {
    /// Failure identifier
    pub id: u64,

    /// When the failure occurred
    #[arg(long, value_parser = time::parse_timestamp)]
    pub at: Option<NaiveDateTime>,

    /// Downtime in hours
    #[arg(long, value_parser = hours_arg)]
    pub downtime: Option<f64>,

    /// Status
    #[arg(long)]
    pub status: Option<FailureStatus>,

    /// Root cause
    #[arg(long)]
    pub cause: Option<String>,

    /// Repair cost
    #[arg(long, value_parser = cost_arg)]
    pub cost: Option<f64>,
}

/// `upkeep work-order ...`
#[derive(Subcommand, Debug)]
pub enum WorkOrderAction {
    /// List work orders
    List {
        /// Only this asset
        #[arg(long)]
        asset: Option<u64>,
    },

    /// Create a work order
    Add(NewWorkOrder),

    /// Start a created work order
    Start {
        /// Work order identifier
        id: u64,

        /// Start time (defaults to now)
        #[arg(long, value_parser = time::parse_timestamp)]
        at: Option<NaiveDateTime>,
    },

    /// Close a started work order
    Close {
        /// Work order identifier
        id: u64,

        /// End time (defaults to now)
        #[arg(long, value_parser = time::parse_timestamp)]
        at: Option<NaiveDateTime>,
    },
}

/// Fields of a new work order.
#[derive(Args, Debug, Clone)]
pub struct NewWorkOrder {
    /// Identifier (defaults to the next free one)
    #[arg(long)]
    pub id: Option<u64>,

    /// Asset the work is for
    #[arg(long)]
    pub asset: u64,

    /// Kind of work (preventive, corrective)
    #[arg(long)]
    pub kind: WorkOrderKind,

    /// Planned date
    #[arg(long, value_parser = time::parse_timestamp)]
    pub scheduled: Option<NaiveDateTime>,

    /// Cost
    #[arg(long, value_parser = cost_arg)]
    pub cost: Option<f64>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
}

/// `upkeep config ...`
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `store.path`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Where to write it (defaults to the platform config dir)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

fn date_arg(s: &str) -> upkeep_core::Result<NaiveDate> {
    time::parse_date("date", s)
}

fn hours_arg(s: &str) -> upkeep_core::Result<f64> {
    numbers::parse_hours("downtime", s)
}

fn cost_arg(s: &str) -> upkeep_core::Result<f64> {
    numbers::parse_hours("cost", s)
}
