//! Error taxonomy for request operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::RequestId;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type alias for request service operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Stable error tag reported to clients as `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    /// Caller-supplied data was rejected.
    InvalidInput,
    /// Anything else went wrong.
    UnknownError,
}

impl ErrorType {
    /// Tag as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

/// Failure of a request service operation.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A status edit targeted an id with no record.
    #[error("No request found with id: {0}")]
    NotFound(RequestId),

    /// The store failed.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StoreError),
}

impl RequestError {
    /// The client-facing tag for this error.
    ///
    /// An unknown id is the caller's mistake, so it reports as invalid input.
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        match self {
            Self::InvalidInput(_) | Self::NotFound(_) => ErrorType::InvalidInput,
            Self::StorageFailure(_) => ErrorType::UnknownError,
        }
    }

    /// Whether the caller can fix this by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.error_type(), ErrorType::InvalidInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_reports_as_invalid_input() {
        let err = RequestError::NotFound(RequestId::new());
        assert_eq!(err.error_type(), ErrorType::InvalidInput);
        assert!(err.is_client_error());
    }

    #[test]
    fn storage_failure_reports_as_unknown() {
        let err = RequestError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.error_type(), ErrorType::UnknownError);
        assert_eq!(err.to_string(), "Storage failure: Store unavailable: connection refused");
    }

    #[test]
    fn error_type_serializes_as_tag() {
        let json = serde_json::to_string(&ErrorType::InvalidInput).unwrap_or_default();
        assert_eq!(json, "\"INVALID_INPUT\"");
        assert_eq!(ErrorType::UnknownError.as_str(), "UNKNOWN_ERROR");
    }
}
