//! Venice Core - client-side synchronization and view consistency
//!
//! The in-memory side of the directory app: rating aggregation, the
//! session/identity manager, the synchronization controller that owns
//! the shared snapshot, pure view projections, and the [`DirectoryApp`]
//! command facade that any UI layer drives.

pub mod app;
pub mod projection;
pub mod rating;
pub mod session;
pub mod snapshot;
pub mod sync;
pub mod verify;

pub use app::{BusinessForm, DirectoryApp, PhotoSource, ReviewForm};
pub use rating::{average_rating, OwnerStats};
pub use session::{SessionManager, SessionState, SignInForm, SignUpForm};
pub use snapshot::Snapshot;
pub use sync::SyncController;

// Re-export the gateway seam so app code only needs this crate
pub use venice_client::{DirectoryGateway, Gateway, ReviewWritePath};
