//! Configuration management trait.
//!
//! Any serde-serialisable configuration type implementing [`ConfigManager`]
//! gets file discovery, TOML loading, environment overrides, and export for
//! free. The CLI's `config` subcommands are written against this trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use crate::{Error, Result};

/// File name used inside the per-project config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Trait for layered project configuration.
///
/// Resolution order for the file: explicit path, then the
/// `<PREFIX>_CONFIG` environment variable, then
/// `<platform config dir>/<project>/config.toml`. After the file (or the
/// defaults, when no file exists) `<PREFIX>_<SECTION>_<KEY>` environment
/// variables override individual values.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Project name, used for directories and the environment prefix.
    fn project_name() -> &'static str;

    /// Environment variable prefix (`upkeep` → `UPKEEP`).
    fn env_prefix() -> String {
        Self::project_name().to_uppercase().replace(['-', ' '], "_")
    }

    /// Default location of the config file, if the platform has a config dir.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join(CONFIG_FILE_NAME))
    }

    /// Resolve which config file to use.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(format!("{}_CONFIG", Self::env_prefix()))
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load configuration from the resolved file and the process environment.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                Self::from_toml_str(&content)
                    .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?
            }
            _ => Self::default(),
        };
        config.with_env_overrides(std::env::vars())
    }

    /// Parse configuration from TOML text.
    fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Apply `<PREFIX>_<SECTION>_<KEY>` overrides from the given variables.
    ///
    /// Keys are matched against the flattened configuration, so only existing
    /// settings can be overridden. Values are re-typed after the type of the
    /// value they replace.
    fn with_env_overrides<I>(self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut root = toml::Value::try_from(&self).map_err(|e| Error::config(e.to_string()))?;
        let prefix = format!("{}_", Self::env_prefix());
        let known: Vec<(String, Vec<String>)> = flatten(&root, &mut Vec::new())
            .into_iter()
            .map(|(path, _)| (env_key(&prefix, &path), path))
            .collect();

        let mut changed = false;
        for (key, raw) in vars {
            let Some((_, path)) = known.iter().find(|(k, _)| *k == key) else {
                continue;
            };
            let Some(slot) = lookup_mut(&mut root, path) else {
                continue;
            };
            *slot = retype(slot, &raw).map_err(|msg| Error::config(format!("{key}: {msg}")))?;
            changed = true;
        }

        if !changed {
            return Ok(self);
        }
        let text = toml::to_string(&root).map_err(|e| Error::config(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// The value at a dotted key such as `store.path`, formatted for display.
    ///
    /// A section key yields the whole section as TOML.
    fn setting(&self, key: &str) -> Result<String> {
        let root = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        match lookup(&root, &dotted(key)) {
            Some(toml::Value::String(s)) => Ok(s.clone()),
            Some(section @ toml::Value::Table(_)) => {
                toml::to_string_pretty(section).map_err(|e| Error::config(e.to_string()))
            }
            Some(other) => Ok(other.to_string()),
            None => Err(Error::config(format!("Key '{key}' not found in configuration"))),
        }
    }

    /// Replace the value at a dotted key, typed after the value it replaces.
    ///
    /// Only existing settings can change, and the result must still parse,
    /// so a wrongly typed value or an unknown label is an error.
    fn with_setting(self, key: &str, raw: &str) -> Result<Self> {
        let mut root = toml::Value::try_from(&self).map_err(|e| Error::config(e.to_string()))?;
        let slot = lookup_mut(&mut root, &dotted(key))
            .filter(|slot| !slot.is_table())
            .ok_or_else(|| Error::config(format!("Unknown configuration key '{key}'")))?;
        *slot = retype(slot, raw).map_err(|msg| Error::config(format!("{key}: {msg}")))?;

        let text = toml::to_string(&root).map_err(|e| Error::config(e.to_string()))?;
        toml::from_str(&text).map_err(|e| Error::config(format!("{key}: {e}")))
    }

    /// Serialize to pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten into `(ENV_KEY, value)` pairs, in document order.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let root = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let prefix = format!("{}_", Self::env_prefix());
        Ok(flatten(&root, &mut Vec::new())
            .into_iter()
            .map(|(path, value)| (env_key(&prefix, &path), value))
            .collect())
    }
}

fn env_key(prefix: &str, path: &[String]) -> String {
    format!("{prefix}{}", path.join("_").to_uppercase().replace('-', "_"))
}

fn flatten(value: &toml::Value, path: &mut Vec<String>) -> Vec<(Vec<String>, String)> {
    match value {
        toml::Value::Table(table) => {
            let mut out = Vec::new();
            for (key, child) in table {
                path.push(key.clone());
                out.extend(flatten(child, path));
                path.pop();
            }
            out
        }
        toml::Value::String(s) => vec![(path.clone(), s.clone())],
        other => vec![(path.clone(), other.to_string())],
    }
}

fn dotted(key: &str) -> Vec<String> {
    key.split('.').map(str::to_string).collect()
}

fn lookup<'a>(root: &'a toml::Value, path: &[String]) -> Option<&'a toml::Value> {
    path.iter()
        .try_fold(root, |current, part| current.as_table()?.get(part))
}

fn lookup_mut<'a>(root: &'a mut toml::Value, path: &[String]) -> Option<&'a mut toml::Value> {
    let mut current = root;
    for part in path {
        current = current.as_table_mut()?.get_mut(part)?;
    }
    Some(current)
}

fn retype(current: &toml::Value, raw: &str) -> std::result::Result<toml::Value, String> {
    match current {
        toml::Value::Boolean(_) => raw
            .parse::<bool>()
            .map(toml::Value::Boolean)
            .map_err(|_| format!("expected true or false, got '{raw}'")),
        toml::Value::Integer(_) => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| format!("expected an integer, got '{raw}'")),
        toml::Value::Float(_) => raw
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|_| format!("expected a number, got '{raw}'")),
        _ => Ok(toml::Value::String(raw.to_string())),
    }
}
