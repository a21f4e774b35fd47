//! `upkeep config` subcommands.
//!
//! These run before any store is opened. Like the store-backed
//! [`commands`](crate::commands), each returns the text to print.

use std::path::{Path, PathBuf};

use upkeep_core::{ConfigManager, Error, Result};

use crate::cli::ConfigAction;
use crate::config::UpkeepConfig;

/// Run a config subcommand against the file `config_path` resolves to.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Path => {
            let path = config_file(config_path)?;
            if !path.exists() {
                eprintln!("(no file yet; `upkeep config init` creates it)");
            }
            Ok(format!("{}\n", path.display()))
        }
        ConfigAction::Get { key } => {
            let value = UpkeepConfig::load(config_path)?.setting(&key)?;
            Ok(format!("{}\n", value.trim_end()))
        }
        ConfigAction::Set { key, value } => {
            let path = config_file(config_path)?;
            set_in_file(&path, &key, &value)?;
            Ok(format!("Set {key} = {value} in {}\n", path.display()))
        }
        ConfigAction::Init { file, force } => {
            let path = config_file(file.as_deref().or(config_path))?;
            init_file(&path, force)?;
            Ok(format!("Config file created at {}\n", path.display()))
        }
        ConfigAction::Export { docker_env } => {
            let config = UpkeepConfig::load(config_path)?;
            env_lines(&config, docker_env)
        }
    }
}

fn config_file(explicit: Option<&str>) -> Result<PathBuf> {
    UpkeepConfig::resolve_config_path(explicit)
        .ok_or_else(|| Error::config("Could not determine the config directory for this platform"))
}

/// Change one setting in the file at `path`.
///
/// Only the file is read, so environment overrides never leak into it. The
/// file is rewritten in full, with defaults for anything it left out.
fn set_in_file(path: &Path, key: &str, value: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `upkeep config init` first.",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let config = UpkeepConfig::from_toml_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?
        .with_setting(key, value)?;
    std::fs::write(path, config.to_toml_string()?).map_err(|e| Error::io_with_path(e, path))
}

fn init_file(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }
    let text = UpkeepConfig::default().to_toml_string()?;
    std::fs::write(path, text).map_err(|e| Error::io_with_path(e, path))
}

/// One `KEY=value` line per setting, or `--env KEY=value` for `docker run`.
fn env_lines(config: &UpkeepConfig, docker_env: bool) -> Result<String> {
    let flag = if docker_env { "--env " } else { "" };
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| format!("{flag}{key}={value}\n"))
        .collect())
}
