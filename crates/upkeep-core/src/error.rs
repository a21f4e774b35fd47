//! Error types for upkeep-core.

use std::path::{Path, PathBuf};

use crate::types::EntityKind;

/// Result type alias for Upkeep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating, ingesting, or storing
/// maintenance records.
///
/// Marked `#[non_exhaustive]` so new failure modes can be added without
/// breaking downstream matches.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A field failed validation (negative duration, unparsable date, ...).
    #[error("Validation error: {}", display_validation(.field, .message))]
    Validation {
        /// Field that failed validation, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A row-level error raised while ingesting tabular input.
    #[error("{file}:{line}: {error}")]
    Ingest {
        /// Name of the file or table being read
        file: String,
        /// 1-based line number (header is line 1)
        line: u64,
        /// The underlying row error
        error: Box<Error>,
    },

    /// A failure or work order references an asset that does not exist.
    #[error("Referential integrity error: {kind} {id} references unknown asset {asset_id}")]
    ReferentialIntegrity {
        /// Kind of the referencing record
        kind: EntityKind,
        /// Identifier of the referencing record
        id: u64,
        /// The missing asset identifier
        asset_id: u64,
    },

    /// A record was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up
        kind: EntityKind,
        /// Identifier that was not found
        id: u64,
    },

    /// A record with the same identifier already exists.
    #[error("{kind} already exists: {id}")]
    Duplicate {
        /// Kind of record
        kind: EntityKind,
        /// Conflicting identifier
        id: u64,
    },

    /// A work-order lifecycle transition that is not allowed.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// I/O error without path context.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    IoWithPath {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_validation(field: &Option<String>, message: &str) -> String {
    match field {
        Some(field) => format!("{field}: {message}"),
        None => message.to_string(),
    }
}

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Wraps this error with the file and line it was read from.
    pub fn at_line<S: Into<String>>(self, file: S, line: u64) -> Self {
        Error::Ingest {
            file: file.into(),
            line,
            error: Box::new(self),
        }
    }

    /// Creates a referential-integrity error.
    pub fn dangling(kind: EntityKind, id: u64, asset_id: u64) -> Self {
        Error::ReferentialIntegrity { kind, id, asset_id }
    }

    /// Creates a not-found error.
    pub fn not_found(kind: EntityKind, id: u64) -> Self {
        Error::NotFound { kind, id }
    }

    /// Creates a duplicate-record error.
    pub fn duplicate(kind: EntityKind, id: u64) -> Self {
        Error::Duplicate { kind, id }
    }

    /// Creates an invalid-transition error.
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Error::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates an I/O error carrying the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Returns whether this error is a data problem in the input records
    /// (as opposed to an environment or backend problem).
    pub fn is_data_error(&self) -> bool {
        match self {
            Error::Validation { .. }
            | Error::ReferentialIntegrity { .. }
            | Error::Duplicate { .. }
            | Error::InvalidTransition { .. } => true,
            Error::Ingest { error, .. } => error.is_data_error(),
            Error::NotFound { .. }
            | Error::Io(_)
            | Error::IoWithPath { .. }
            | Error::Config { .. }
            | Error::Serialization(_) => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_with_field() {
        let err = Error::validation_field("tiempo_fuera_servicio_h", "must not be negative");
        assert_eq!(
            err.to_string(),
            "Validation error: tiempo_fuera_servicio_h: must not be negative"
        );
    }

    #[test]
    fn test_validation_display_without_field() {
        let err = Error::validation("empty row");
        assert_eq!(err.to_string(), "Validation error: empty row");
        let Error::Validation { field, message } = err else {
            unreachable!("Expected Validation error");
        };
        assert_eq!(field, None);
        assert_eq!(message, "empty row");
    }

    #[test]
    fn test_at_line_wraps_error() {
        let err = Error::validation_field("fecha", "not a date").at_line("fallas.csv", 7);
        assert_eq!(
            err.to_string(),
            "fallas.csv:7: Validation error: fecha: not a date"
        );
        assert!(err.is_data_error());
    }

    #[test]
    fn test_referential_integrity_display() {
        let err = Error::dangling(EntityKind::Failure, 12, 99);
        assert_eq!(
            err.to_string(),
            "Referential integrity error: failure 12 references unknown asset 99"
        );
        assert!(err.is_data_error());
    }

    #[test]
    fn test_not_found_is_not_data_error() {
        let err = Error::not_found(EntityKind::Asset, 3);
        assert_eq!(err.to_string(), "asset not found: 3");
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = Error::invalid_transition("closed", "in_progress");
        assert_eq!(err.to_string(), "Invalid transition: closed -> in_progress");
    }

    #[test]
    fn test_io_with_path_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/activos.csv");
        assert!(err.to_string().contains("/tmp/activos.csv"));
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: Error = serde_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
