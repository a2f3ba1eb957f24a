//! Data models
//!
//! Domain objects plus their backend row representations. Row types use
//! the backend's snake_case column names; conversion between the two is
//! handled by `From` impls so there is exactly one mapping per entity.
//! All IDs are strings (backend UUIDs, plus the `"guest"` sentinel).

pub mod business;
pub mod favorite;
pub mod review;
pub mod user;

// Re-exports
pub use business::*;
pub use favorite::*;
pub use review::*;
pub use user::*;
