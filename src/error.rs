//! Error types for the join filter and its collaborators.

use thiserror::Error;

/// The error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum IrisError {
    /// The schema or a filter definition is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An argument passed to an operation was not acceptable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An index-level invariant was violated (bad doc id, unknown segment, ...).
    #[error("Index error: {0}")]
    Index(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IrisError {
    /// Create a configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        IrisError::InvalidConfig(msg.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        IrisError::InvalidArgument(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        IrisError::Index(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        IrisError::Internal(msg.into())
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IrisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrisError::invalid_config("unknown parent type [blog]");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: unknown parent type [blog]"
        );

        let err = IrisError::index("doc 12 out of range");
        assert_eq!(err.to_string(), "Index error: doc 12 out of range");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: IrisError = parse.unwrap_err().into();
        assert!(matches!(err, IrisError::Json(_)));
    }
}
