//! Error types for web handlers.
//!
//! [`AppError`] bridges service errors and HTTP responses. Every error body
//! has the same shape:
//!
//! ```json
//! { "errorType": "INVALID_INPUT", "message": "Invalid input: missing field `requestorName`" }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use item_requests_core::{ErrorType, RequestError, ValidationError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Server errors keep their cause for logging but only send a generic
/// message to the client.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error_type: ErrorType,
    message: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, error_type: ErrorType, message: String) -> Self {
        Self {
            status,
            error_type,
            message,
            source: None,
        }
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// A 400 `INVALID_INPUT` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorType::InvalidInput, message.into())
    }

    /// A 500 `UNKNOWN_ERROR` error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::UnknownError,
            message.into(),
        )
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Tag reported as `errorType`.
    #[must_use]
    pub const fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_type.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_type: ErrorType,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    error_type = self.error_type.as_str(),
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    error_type = self.error_type.as_str(),
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            error_type: self.error_type,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RequestError> for AppError {
    fn from(err: RequestError) -> Self {
        match err.error_type() {
            ErrorType::InvalidInput => Self::invalid_input(err.to_string()),
            ErrorType::UnknownError => {
                Self::unknown("An internal error occurred").with_source(anyhow::Error::new(err))
            }
        }
    }
}

/// A body that is not JSON is invalid input, same as a JSON body that fails
/// validation.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        RequestError::from(ValidationError::MalformedBody(rejection.body_text())).into()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::unknown("An internal error occurred").with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_requests_core::{RequestId, StoreError};

    #[test]
    fn test_error_display() {
        let err = AppError::invalid_input("status is required");
        assert_eq!(err.to_string(), "[INVALID_INPUT] status is required");
    }

    #[test]
    fn test_validation_failure_is_bad_request() {
        let err = AppError::from(RequestError::InvalidInput(ValidationError::Missing("status")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), ErrorType::InvalidInput);
    }

    #[test]
    fn test_not_found_is_bad_request() {
        let id = RequestId::new();
        let err = AppError::from(RequestError::NotFound(id));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn test_storage_failure_hides_detail() {
        let err = AppError::from(RequestError::StorageFailure(StoreError::Unavailable(
            "password authentication failed".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), ErrorType::UnknownError);
        assert!(!err.message().contains("password"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_anyhow_is_unknown_error() {
        let err = AppError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.error_type(), ErrorType::UnknownError);
    }
}
