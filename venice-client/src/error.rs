//! Client error types

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Gateway error type
///
/// Every failed call names the operation that failed; callers must not
/// assume partial success — a failed write leaves local state unchanged
/// until the next explicit sync.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend rejected the request
    #[error("{operation} failed: {message}")]
    Remote {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Request exceeded the configured timeout
    #[error("{operation} timed out")]
    Timeout { operation: String },

    /// Authentication required or credentials rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Transport-level failure before any response
    #[error("HTTP error during {operation}: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Optional backend schema capability is absent
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Client construction failed
    #[error("Client build error: {0}")]
    Build(String),
}

/// Result type for gateway operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Classify a reqwest error for the given operation, separating
    /// timeouts from other transport failures.
    pub fn from_reqwest(operation: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                operation: operation.to_string(),
            }
        } else {
            ClientError::Http {
                operation: operation.to_string(),
                source: err,
            }
        }
    }

    /// The operation this error belongs to, when known.
    pub fn operation(&self) -> Option<&str> {
        match self {
            ClientError::Remote { operation, .. }
            | ClientError::Timeout { operation }
            | ClientError::Http { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Remote {
                operation, status, ..
            } => {
                let mut app = AppError::remote(operation.clone(), err.to_string());
                if let Some(code) = status {
                    app = app.with_detail("http_status", *code);
                }
                app
            }
            ClientError::Timeout { operation } => {
                AppError::with_message(ErrorCode::Timeout, err.to_string())
                    .with_detail("operation", operation.clone())
            }
            ClientError::Unauthorized => AppError::not_authenticated(),
            ClientError::Http { operation, .. } => {
                AppError::with_message(ErrorCode::NetworkError, err.to_string())
                    .with_detail("operation", operation.clone())
            }
            ClientError::Serialization(_) => {
                AppError::with_message(ErrorCode::RemoteError, err.to_string())
            }
            ClientError::UnsupportedFeature(msg) => AppError::unsupported(msg.clone()),
            ClientError::Build(msg) => {
                AppError::with_message(ErrorCode::Unknown, msg.clone())
            }
        }
    }
}
