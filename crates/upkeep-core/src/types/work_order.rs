//! Work orders and their lifecycle.
//!
//! ```text
//! Created ──start──▶ InProgress ──close──▶ Closed
//! ```
//!
//! No other transitions exist.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AssetId, WorkOrderId};
use super::normalize_label;
use crate::util::numbers::check_non_negative;
use crate::util::time::hours_between;
use crate::{Error, Result};

/// Kind of maintenance a work order performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderKind {
    /// Planned maintenance.
    Preventive,
    /// Repair after a failure.
    Corrective,
}

impl WorkOrderKind {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderKind::Preventive => "preventive",
            WorkOrderKind::Corrective => "corrective",
        }
    }
}

impl fmt::Display for WorkOrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkOrderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_label(s).as_str() {
            "preventive" | "preventivo" | "preventiva" => Ok(WorkOrderKind::Preventive),
            "corrective" | "correctivo" | "correctiva" => Ok(WorkOrderKind::Corrective),
            _ => Err(Error::validation_field(
                "tipo",
                format!("unknown work order type '{}'", s.trim()),
            )),
        }
    }
}

/// Lifecycle status of a work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    /// Created, not started.
    #[default]
    Created,
    /// Work under way.
    InProgress,
    /// Work finished.
    Closed,
}

impl WorkOrderStatus {
    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Created => "created",
            WorkOrderStatus::InProgress => "in_progress",
            WorkOrderStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkOrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_label(s).as_str() {
            "created" | "pendiente" | "programada" => Ok(WorkOrderStatus::Created),
            "in_progress" | "en_proceso" | "en_progreso" => Ok(WorkOrderStatus::InProgress),
            "closed" | "completada" | "cerrada" => Ok(WorkOrderStatus::Closed),
            _ => Err(Error::validation_field(
                "estado",
                format!("unknown work order status '{}'", s.trim()),
            )),
        }
    }
}

/// A unit of maintenance work against an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    /// Work order identifier
    pub id: WorkOrderId,
    /// Asset the work is done on
    pub asset_id: AssetId,
    /// Preventive or corrective
    pub kind: WorkOrderKind,
    /// Lifecycle status
    #[serde(default)]
    pub status: WorkOrderStatus,
    /// Planned execution date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<NaiveDateTime>,
    /// Actual start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<NaiveDateTime>,
    /// Actual end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<NaiveDateTime>,
    /// Recorded duration in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    /// Actual cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkOrder {
    /// Creates a new work order in the `Created` state.
    pub fn new(id: WorkOrderId, asset_id: AssetId, kind: WorkOrderKind) -> Self {
        Self {
            id,
            asset_id,
            kind,
            status: WorkOrderStatus::Created,
            scheduled_for: None,
            started_at: None,
            ended_at: None,
            duration_hours: None,
            cost: None,
            description: None,
        }
    }

    /// Sets the planned execution date.
    pub fn scheduled(mut self, at: NaiveDateTime) -> Self {
        self.scheduled_for = Some(at);
        self
    }

    /// Sets the cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Moves the order from `Created` to `InProgress`.
    pub fn start(&mut self, at: NaiveDateTime) -> Result<()> {
        if self.status != WorkOrderStatus::Created {
            return Err(Error::invalid_transition(
                self.status,
                WorkOrderStatus::InProgress,
            ));
        }
        self.status = WorkOrderStatus::InProgress;
        self.started_at.get_or_insert(at);
        Ok(())
    }

    /// Moves the order from `InProgress` to `Closed`, recording the end time
    /// and, when no duration was recorded, deriving it from start and end.
    pub fn close(&mut self, at: NaiveDateTime) -> Result<()> {
        if self.status != WorkOrderStatus::InProgress {
            return Err(Error::invalid_transition(self.status, WorkOrderStatus::Closed));
        }
        if let Some(start) = self.started_at
            && at < start
        {
            return Err(Error::validation_field(
                "fecha_fin",
                "end must not precede start",
            ));
        }
        self.status = WorkOrderStatus::Closed;
        self.ended_at = Some(at);
        if self.duration_hours.is_none() {
            self.duration_hours = self.derived_duration_hours();
        }
        Ok(())
    }

    /// The recorded duration, or the span between start and end.
    pub fn effective_duration_hours(&self) -> Option<f64> {
        self.duration_hours.or_else(|| self.derived_duration_hours())
    }

    fn derived_duration_hours(&self) -> Option<f64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(hours_between(&start, &end)),
            _ => None,
        }
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(duration) = self.duration_hours {
            check_non_negative("duracion_h", duration)?;
        }
        if let Some(cost) = self.cost {
            check_non_negative("costo_real", cost)?;
        }
        if let (Some(start), Some(end)) = (self.started_at, self.ended_at)
            && end < start
        {
            return Err(Error::validation_field(
                "fecha_fin",
                "end must not precede start",
            ));
        }
        Ok(())
    }
}
