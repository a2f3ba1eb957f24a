//! Shared in-memory snapshot
//!
//! The current copy of businesses, favorites, and user state used for
//! rendering. Mutated only by the synchronization controller (and the
//! session manager's user slot); everything else reads.

use shared::models::{Business, User};
use std::collections::{HashMap, HashSet};

/// Read model for the whole UI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// All businesses, reviews attached, ratings recomputed
    pub businesses: Vec<Business>,
    /// Saved business IDs per user; populated only for the current
    /// non-guest user
    pub favorites: HashMap<String, HashSet<String>>,
    /// The signed-in (or guest) user, if any
    pub current_user: Option<User>,
}

impl Snapshot {
    /// Favorites for the current user (empty for guests and the
    /// signed-out state).
    pub fn favorites_for_current_user(&self) -> HashSet<String> {
        self.current_user
            .as_ref()
            .filter(|u| !u.is_guest())
            .and_then(|u| self.favorites.get(&u.id))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the current user has saved the given business
    pub fn is_favorite(&self, business_id: &str) -> bool {
        self.favorites_for_current_user().contains(business_id)
    }

    pub fn business(&self, business_id: &str) -> Option<&Business> {
        self.businesses.iter().find(|b| b.id == business_id)
    }
}
