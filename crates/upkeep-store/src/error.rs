//! Error types for upkeep-store.

/// Result type alias for upkeep-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in upkeep-store.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error from upkeep-core (validation, integrity, not found, ...).
    #[error(transparent)]
    Core(#[from] upkeep_core::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configured backend name is not known.
    #[error("Unknown store backend '{0}' (expected sqlite or memory)")]
    UnknownBackend(String),
}

impl Error {
    /// The wrapped core error, if any.
    pub fn as_core(&self) -> Option<&upkeep_core::Error> {
        match self {
            Error::Core(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the error is caused by the record itself rather than the backend.
    pub fn is_data_error(&self) -> bool {
        self.as_core().is_some_and(upkeep_core::Error::is_data_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use upkeep_core::EntityKind;

    #[test]
    fn test_core_error_is_transparent() {
        let err: Error = upkeep_core::Error::duplicate(EntityKind::Failure, 4).into();
        assert_eq!(err.to_string(), "failure already exists: 4");
        assert!(err.is_data_error());
    }

    #[test]
    fn test_backend_errors_are_not_data_errors() {
        let err = Error::UnknownBackend("postgres".into());
        assert!(!err.is_data_error());
        assert!(err.as_core().is_none());
        assert!(err.to_string().contains("postgres"));
    }
}
