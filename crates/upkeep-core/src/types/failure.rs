//! Failure reports.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AssetId, FailureId};
use super::normalize_label;
use crate::util::numbers::check_non_negative;
use crate::{Error, Result};

/// Where a failure report is in its handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStatus {
    /// Reported, not yet looked at.
    #[default]
    Reported,
    /// Being diagnosed.
    UnderReview,
    /// Repair in progress.
    InRepair,
    /// Repaired.
    Resolved,
    /// Repaired and administratively closed.
    Closed,
    /// Not a real failure.
    Invalid,
}

impl FailureStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [FailureStatus; 6] = [
        FailureStatus::Reported,
        FailureStatus::UnderReview,
        FailureStatus::InRepair,
        FailureStatus::Resolved,
        FailureStatus::Closed,
        FailureStatus::Invalid,
    ];

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureStatus::Reported => "reported",
            FailureStatus::UnderReview => "under_review",
            FailureStatus::InRepair => "in_repair",
            FailureStatus::Resolved => "resolved",
            FailureStatus::Closed => "closed",
            FailureStatus::Invalid => "invalid",
        }
    }

    /// Whether the repair is finished (`Resolved` or `Closed`).
    pub fn is_resolved(&self) -> bool {
        matches!(self, FailureStatus::Resolved | FailureStatus::Closed)
    }
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_label(s).as_str() {
            "reported" | "reportada" => Ok(FailureStatus::Reported),
            "under_review" | "en_revision" => Ok(FailureStatus::UnderReview),
            "in_repair" | "en_reparacion" => Ok(FailureStatus::InRepair),
            "resolved" | "resuelta" | "completada" => Ok(FailureStatus::Resolved),
            "closed" | "cerrada" => Ok(FailureStatus::Closed),
            "invalid" | "invalida" => Ok(FailureStatus::Invalid),
            _ => Err(Error::validation_field(
                "estado",
                format!("unknown failure status '{}'", s.trim()),
            )),
        }
    }
}

/// A reported failure of an asset.
///
/// Created on report; afterwards only changed by administrative correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure identifier
    pub id: FailureId,
    /// Asset that failed (a reference, not ownership)
    pub asset_id: AssetId,
    /// When the failure occurred
    pub occurred_at: NaiveDateTime,
    /// Time the asset was out of service, in hours
    pub downtime_hours: f64,
    /// Handling status
    #[serde(default)]
    pub status: FailureStatus,
    /// Identified root cause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    /// Repair cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_cost: Option<f64>,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Failure {
    /// Creates a new failure in the `Reported` state.
    pub fn new(
        id: FailureId,
        asset_id: AssetId,
        occurred_at: NaiveDateTime,
        downtime_hours: f64,
    ) -> Self {
        Self {
            id,
            asset_id,
            occurred_at,
            downtime_hours,
            status: FailureStatus::Reported,
            root_cause: None,
            repair_cost: None,
            description: None,
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: FailureStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the root cause.
    pub fn with_root_cause(mut self, cause: impl Into<String>) -> Self {
        self.root_cause = Some(cause.into());
        self
    }

    /// Sets the repair cost.
    pub fn with_repair_cost(mut self, cost: f64) -> Self {
        self.repair_cost = Some(cost);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks field-level invariants: downtime and cost are finite and
    /// non-negative.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("tiempo_fuera_servicio_h", self.downtime_hours)?;
        if let Some(cost) = self.repair_cost {
            check_non_negative("costo_reparacion", cost)?;
        }
        Ok(())
    }
}
