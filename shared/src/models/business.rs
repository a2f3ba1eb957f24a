//! Business model and wire row

use super::Review;
use serde::{Deserialize, Serialize};

/// A business as the app works with it.
///
/// `average_rating` is always derived from `reviews` — it is carried on
/// the wire for legacy rows but is never authoritative; the sync layer
/// recomputes it whenever the review collection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub short_description: String,
    pub hours: String,
    /// Free-text deal description, empty when no deal is posted
    #[serde(default)]
    pub special_deals: String,
    pub owner_user_id: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub average_rating: f64,
    /// Empty when absent or when the backend lacks the photo column
    #[serde(default)]
    pub photo_url: String,
}

impl Business {
    pub fn has_deal(&self) -> bool {
        !self.special_deals.trim().is_empty()
    }
}

/// Backend `businesses` table row.
///
/// `reviews` is the legacy embedded collection, still written by the
/// degraded-mode review path. `photo_url` is an optional column probed
/// at runtime; `None` is omitted from writes so rows on backends without
/// the column still persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub short_description: String,
    pub hours: String,
    #[serde(default)]
    pub special_deals: String,
    pub owner_id: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<BusinessRow> for Business {
    fn from(row: BusinessRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            address: row.address,
            short_description: row.short_description,
            hours: row.hours,
            special_deals: row.special_deals,
            owner_user_id: row.owner_id,
            reviews: row.reviews,
            average_rating: row.average_rating,
            photo_url: row.photo_url.unwrap_or_default(),
        }
    }
}

impl Business {
    /// Convert back to a wire row. The photo column is only written when
    /// the capability probe confirmed it exists; otherwise the field is
    /// dropped instead of failing the whole write.
    pub fn to_row(&self, photo_column_supported: bool) -> BusinessRow {
        BusinessRow {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category.clone(),
            address: self.address.clone(),
            short_description: self.short_description.clone(),
            hours: self.hours.clone(),
            special_deals: self.special_deals.clone(),
            owner_id: self.owner_user_id.clone(),
            reviews: self.reviews.clone(),
            average_rating: self.average_rating,
            photo_url: if photo_column_supported && !self.photo_url.is_empty() {
                Some(self.photo_url.clone())
            } else {
                None
            },
        }
    }
}
