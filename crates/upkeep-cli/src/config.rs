//! Application configuration for the `upkeep` binary.

use serde::{Deserialize, Serialize};
use upkeep_core::ConfigManager;
use upkeep_kpi::KpiOptions;
use upkeep_store::StoreConfig;

/// Top-level configuration, read from `config.toml`.
///
/// ```toml
/// [store]
/// backend = "sqlite"
/// path = "upkeep.db"
/// max_connections = 4
///
/// [kpi]
/// resolved_only = false
/// fleet_policy = "pooled"
///
/// [logging]
/// level = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpkeepConfig {
    /// Where records are kept
    pub store: StoreConfig,
    /// Which failures count and how the fleet figure is built
    pub kpi: KpiOptions,
    /// Log output
    pub logging: LoggingConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ConfigManager for UpkeepConfig {
    fn project_name() -> &'static str {
        "upkeep"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use upkeep_kpi::FleetPolicy;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = UpkeepConfig::default();
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.path, "upkeep.db");
        assert!(!config.kpi.resolved_only);
        assert_eq!(config.kpi.fleet_policy, FleetPolicy::Pooled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(UpkeepConfig::env_prefix(), "UPKEEP");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config =
            UpkeepConfig::from_toml_str("[kpi]\nfleet_policy = \"mean-of-assets\"\n").unwrap();
        assert_eq!(config.kpi.fleet_policy, FleetPolicy::MeanOfAssets);
        assert!(!config.kpi.resolved_only);
        assert_eq!(config.store, StoreConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = UpkeepConfig::from_toml_str("[kpi]\nfleet_policy = \"median\"\n").unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_env_overrides() {
        let config = UpkeepConfig::default()
            .with_env_overrides(vars(&[
                ("UPKEEP_STORE_BACKEND", "memory"),
                ("UPKEEP_STORE_MAX_CONNECTIONS", "8"),
                ("UPKEEP_KPI_RESOLVED_ONLY", "true"),
                ("UPKEEP_KPI_FLEET_POLICY", "mean-of-assets"),
                ("UPKEEP_LOGGING_LEVEL", "warn"),
            ]))
            .unwrap();
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.max_connections, 8);
        assert!(config.kpi.resolved_only);
        assert_eq!(config.kpi.fleet_policy, FleetPolicy::MeanOfAssets);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_export_lists_every_setting() {
        let keys: Vec<String> = UpkeepConfig::default()
            .to_env_vars()
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        for key in [
            "UPKEEP_STORE_BACKEND",
            "UPKEEP_STORE_PATH",
            "UPKEEP_STORE_MAX_CONNECTIONS",
            "UPKEEP_KPI_RESOLVED_ONLY",
            "UPKEEP_KPI_FLEET_POLICY",
            "UPKEEP_LOGGING_LEVEL",
        ] {
            assert!(keys.iter().any(|k| k == key), "missing {key}");
        }
    }
}
