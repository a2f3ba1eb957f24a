//! Review model
//!
//! Reviews are immutable once created; there is no edit or delete path.
//! Ordering is whatever insertion order the backend returns.

use serde::{Deserialize, Serialize};

/// A single review as the app works with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: String,
    pub user_name: String,
    /// Integer stars, 1..=5
    pub rating: u8,
    pub comment: String,
    /// RFC 3339 creation timestamp
    pub date: String,
    pub avatar: String,
    /// Optional photo URL, empty string when absent
    #[serde(default)]
    pub photo: String,
}

/// Backend `reviews` table row. Same fields plus the owning business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRow {
    pub business_id: String,
    pub user_id: String,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: String,
    pub avatar: String,
    #[serde(default)]
    pub photo: String,
}

impl ReviewRow {
    pub fn new(business_id: impl Into<String>, review: &Review) -> Self {
        Self {
            business_id: business_id.into(),
            user_id: review.user_id.clone(),
            user_name: review.user_name.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            date: review.date.clone(),
            avatar: review.avatar.clone(),
            photo: review.photo.clone(),
        }
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            user_id: row.user_id,
            user_name: row.user_name,
            rating: row.rating,
            comment: row.comment,
            date: row.date,
            avatar: row.avatar,
            photo: row.photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_row_round_trip() {
        let review = Review {
            user_id: "u1".to_string(),
            user_name: "Ada".to_string(),
            rating: 4,
            comment: "Great espresso".to_string(),
            date: "2025-06-01T12:00:00Z".to_string(),
            avatar: "a.png".to_string(),
            photo: String::new(),
        };
        let row = ReviewRow::new("b1", &review);
        assert_eq!(row.business_id, "b1");
        assert_eq!(Review::from(row), review);
    }

    #[test]
    fn test_review_row_missing_photo_column() {
        // Older rows have no photo column at all; deserialization must
        // not fail on the absent field.
        let json = r#"{
            "business_id": "b1",
            "user_id": "u1",
            "user_name": "Ada",
            "rating": 5,
            "comment": "ok",
            "date": "2025-06-01T12:00:00Z",
            "avatar": ""
        }"#;
        let row: ReviewRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.photo, "");
    }
}
