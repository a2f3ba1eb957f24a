//! Favorite relation

use serde::{Deserialize, Serialize};

/// Backend `favorites` row: presence of the pair is the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRow {
    pub user_id: String,
    pub business_id: String,
}

impl FavoriteRow {
    pub fn new(user_id: impl Into<String>, business_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            business_id: business_id.into(),
        }
    }
}

/// Projection used when fetching a user's saved IDs.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoriteBusinessId {
    pub business_id: String,
}
