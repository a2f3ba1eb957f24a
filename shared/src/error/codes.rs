//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General / validation errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Remote errors
//! - 5xxx: Unsupported-feature errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values for efficient serialization and
/// cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Human-verification check failed
    HumanCheckFailed = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Session has expired
    SessionExpired = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 4xxx: Remote ====================
    /// Network or HTTP failure
    NetworkError = 4001,
    /// Backend rejected the request
    RemoteError = 4002,
    /// Request timed out
    Timeout = 4003,
    /// Asset upload failed
    UploadFailed = 4004,

    // ==================== 5xxx: Unsupported feature ====================
    /// Optional backend schema capability is absent
    UnsupportedFeature = 5001,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::ValueOutOfRange => "Value out of range",
            ErrorCode::HumanCheckFailed => "Human verification failed",
            ErrorCode::NotAuthenticated => "Not signed in",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "A different role is required",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::RemoteError => "Backend error",
            ErrorCode::Timeout => "Request timed out",
            ErrorCode::UploadFailed => "Upload failed",
            ErrorCode::UnsupportedFeature => "Feature not supported by the backend",
        }
    }

    /// Whether this code describes a problem resolved entirely locally
    /// (no network call was or should have been made).
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::RequiredField
                | ErrorCode::ValueOutOfRange
                | ErrorCode::HumanCheckFailed
                | ErrorCode::PermissionDenied
                | ErrorCode::RoleRequired
        )
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::HumanCheckFailed),
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1005 => Ok(ErrorCode::SessionExpired),
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            4001 => Ok(ErrorCode::NetworkError),
            4002 => Ok(ErrorCode::RemoteError),
            4003 => Ok(ErrorCode::Timeout),
            4004 => Ok(ErrorCode::UploadFailed),
            5001 => Ok(ErrorCode::UnsupportedFeature),
            _ => Err(format!("Unknown error code: {}", value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", *self as u16, self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_u16_round_trip() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::RemoteError,
            ErrorCode::UnsupportedFeature,
        ];
        for code in codes {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(ErrorCode::try_from(9999).is_err());
    }

    #[test]
    fn test_local_classification() {
        assert!(ErrorCode::HumanCheckFailed.is_local());
        assert!(ErrorCode::PermissionDenied.is_local());
        assert!(!ErrorCode::RemoteError.is_local());
        assert!(!ErrorCode::NotAuthenticated.is_local());
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::Timeout).unwrap();
        assert_eq!(json, "4003");
        let code: ErrorCode = serde_json::from_str("2001").unwrap();
        assert_eq!(code, ErrorCode::PermissionDenied);
    }
}
