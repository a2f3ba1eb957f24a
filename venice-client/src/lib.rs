//! Venice Client - HTTP gateway to the directory backend
//!
//! Typed access to the backend's REST table interface, auth interface,
//! and object storage. The [`DirectoryGateway`] trait is the seam the
//! core sync layer programs against; [`HttpGateway`] is the network
//! implementation.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rest;
pub mod storage;

pub use auth::{AuthClient, AuthSession, AuthUser};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{AuthGateway, DirectoryGateway, Gateway, HttpGateway, ReviewWritePath};
pub use rest::RestClient;
pub use storage::StorageClient;
