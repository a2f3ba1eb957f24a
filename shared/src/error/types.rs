//! Error type with structured code and details

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// The message is always user-displayable; the optional details map
/// carries machine-readable context (failed operation, field name, HTTP
/// status) for logging.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

/// Result type used across the core layer
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a human-verification error
    pub fn human_check(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::HumanCheckFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidCredentials, msg)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a remote/backend error tagged with the failed operation
    pub fn remote(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        let op = operation.into();
        Self::with_message(ErrorCode::RemoteError, msg).with_detail("operation", op)
    }

    /// Create an unsupported-feature error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::UnsupportedFeature, msg)
    }

    /// Whether this error was resolved entirely locally (no network call)
    pub fn is_local(&self) -> bool {
        self.code.is_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_from_code() {
        let err = AppError::new(ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "Not signed in");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_remote_error_carries_operation_detail() {
        let err = AppError::remote("fetch_businesses", "HTTP 503");
        assert_eq!(err.code, ErrorCode::RemoteError);
        let details = err.details.unwrap();
        assert_eq!(details["operation"], "fetch_businesses");
    }

    #[test]
    fn test_error_message_displayable() {
        let err = AppError::validation("Rating must be between 1 and 5.");
        assert_eq!(err.to_string(), "Rating must be between 1 and 5.");
        assert!(err.is_local());
    }
}
