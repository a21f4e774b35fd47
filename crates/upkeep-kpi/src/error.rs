//! Error types for upkeep-kpi.

use serde::Serialize;
use std::fmt;

/// The metric an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Mean time between failures.
    Mtbf,
    /// Mean time to repair.
    Mttr,
    /// MTBF / (MTBF + MTTR).
    Availability,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Mtbf => "MTBF",
            Metric::Mttr => "MTTR",
            Metric::Availability => "Availability",
        })
    }
}

/// Why a KPI could not be computed.
///
/// These are expected outcomes for assets with little history; callers
/// exclude the asset rather than report a fabricated value.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum KpiError {
    /// Not enough failure records.
    #[error("insufficient data for {metric}: need at least {required} failures, found {found}")]
    InsufficientData {
        /// Metric that could not be computed
        metric: Metric,
        /// Minimum number of failures needed
        required: usize,
        /// Number of failures available
        found: usize,
    },

    /// Inputs present but the formula has no value.
    #[error("{metric} is undefined: {reason}")]
    Undefined {
        /// Metric that is undefined
        metric: Metric,
        /// Why
        reason: String,
    },
}

impl KpiError {
    /// Creates an insufficient-data error.
    pub fn insufficient(metric: Metric, required: usize, found: usize) -> Self {
        KpiError::InsufficientData {
            metric,
            required,
            found,
        }
    }

    /// Creates an undefined-value error.
    pub fn undefined<S: Into<String>>(metric: Metric, reason: S) -> Self {
        KpiError::Undefined {
            metric,
            reason: reason.into(),
        }
    }

    /// The metric this error refers to.
    pub fn metric(&self) -> Metric {
        match self {
            KpiError::InsufficientData { metric, .. } | KpiError::Undefined { metric, .. } => {
                *metric
            }
        }
    }
}
