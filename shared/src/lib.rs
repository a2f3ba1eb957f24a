//! Shared types for the Venice Local directory client
//!
//! Domain models, wire row types, the unified error system, and small
//! utilities used by both the remote gateway and the core sync layer.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
