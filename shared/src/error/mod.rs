//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes across all layers
//! - [`AppError`]: rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General / validation errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Remote (network / backend) errors
//! - 5xxx: Unsupported-feature errors

pub mod codes;
pub mod types;

pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
