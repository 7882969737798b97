//! Row production error types

use thiserror::Error;

/// Errors surfaced to the host engine during row production
#[derive(Debug, Error)]
pub enum RowError {
    /// The host engine handed back a parent row of the wrong shape
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A change filter was invoked with no backend selected; callers must
    /// guarantee a backend before asking for invalidation keys
    #[error("no backend is currently selected")]
    NoCurrentBackend,

    /// Instance attributes could not be serialized; fatal for the row since
    /// the attributes column is its primary payload
    #[error("cannot serialize instance attributes: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for row production
pub type RowResult<T> = Result<T, RowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let error = RowError::TypeMismatch {
            expected: "state",
            actual: "instance",
        };
        assert_eq!(
            error.to_string(),
            "type mismatch: expected state, got instance"
        );

        assert_eq!(
            RowError::NoCurrentBackend.to_string(),
            "no backend is currently selected"
        );
    }
}
