//! # upkeep-cli
//!
//! The `upkeep` command-line tool. The binary is a thin shell over this
//! library: argument definitions live in [`cli`], store-backed commands in
//! [`commands`], and `upkeep config` in [`config_handlers`].

#![doc = include_str!("../README.md")]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{LoggingConfig, UpkeepConfig};
pub use error::{Error, Result};
