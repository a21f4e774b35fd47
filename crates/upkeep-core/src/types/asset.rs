//! Assets: the equipment being maintained.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::AssetId;
use super::normalize_label;
use crate::{Error, Result};

/// How critical an asset is to operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    /// Loss of the asset stops production.
    High,
    /// Loss of the asset degrades production.
    #[default]
    Medium,
    /// Loss of the asset is tolerable.
    Low,
}

impl Criticality {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::High => "high",
            Criticality::Medium => "medium",
            Criticality::Low => "low",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criticality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_label(s).as_str() {
            "high" | "alta" | "a" => Ok(Criticality::High),
            "medium" | "media" | "m" => Ok(Criticality::Medium),
            "low" | "baja" | "b" => Ok(Criticality::Low),
            _ => Err(Error::validation_field(
                "criticidad",
                format!("unknown criticality '{}'", s.trim()),
            )),
        }
    }
}

/// A piece of equipment tracked by the system.
///
/// Immutable once created except for administrative edits through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier
    pub id: AssetId,
    /// Descriptive name
    pub name: String,
    /// Criticality tag
    pub criticality: Criticality,
    /// Date the asset was registered
    pub acquired_on: NaiveDate,
    /// Physical location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Person responsible for the asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Asset {
    /// Creates a new asset.
    pub fn new(
        id: AssetId,
        name: impl Into<String>,
        criticality: Criticality,
        acquired_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            criticality,
            acquired_on,
            location: None,
            owner: None,
        }
    }

    /// Sets the physical location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the responsible person.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation_field("nombre", "asset name is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 1).unwrap()
    }

    #[test]
    fn test_criticality_parses_both_languages() {
        assert_eq!("Alta".parse::<Criticality>().unwrap(), Criticality::High);
        assert_eq!("MEDIUM".parse::<Criticality>().unwrap(), Criticality::Medium);
        assert_eq!(" baja ".parse::<Criticality>().unwrap(), Criticality::Low);
        assert!("critical".parse::<Criticality>().is_err());
    }

    #[test]
    fn test_asset_builder() {
        let asset = Asset::new(AssetId::new(1), "Bomba Warman", Criticality::High, date())
            .with_location("Planta 2")
            .with_owner("J. Pérez");
        assert_eq!(asset.location.as_deref(), Some("Planta 2"));
        assert_eq!(asset.owner.as_deref(), Some("J. Pérez"));
        assert!(asset.validate().is_ok());
    }

    #[test]
    fn test_asset_requires_name() {
        let asset = Asset::new(AssetId::new(1), "  ", Criticality::Low, date());
        assert!(asset.validate().is_err());
    }

    #[test]
    fn test_asset_json_skips_empty_optionals() {
        let asset = Asset::new(AssetId::new(3), "Compresor", Criticality::Medium, date());
        let json = serde_json::to_string(&asset).unwrap();
        assert!(json.contains("\"criticality\":\"medium\""));
        assert!(!json.contains("location"));
    }
}
