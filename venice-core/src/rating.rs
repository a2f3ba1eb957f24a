//! Rating aggregation
//!
//! Pure functions over in-memory data: no I/O, deterministic given
//! inputs. `average_rating` is the single source of the one-decimal
//! rounding rule; every place a rating is recomputed goes through it.

use shared::models::{Business, Review};

/// Mean rating rounded to one decimal (half-up on the scaled value),
/// 0.0 for an empty collection.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(sum) / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Dashboard statistics for a business owner
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OwnerStats {
    /// Businesses owned by the user
    pub business_count: usize,
    /// Total reviews across owned businesses
    pub review_count: usize,
    /// Mean of the owned businesses' average ratings, one decimal
    pub average_rating: f64,
    /// Owned businesses with a non-empty deals string
    pub active_deals: usize,
}

impl OwnerStats {
    pub fn compute(businesses: &[Business], owner_id: &str) -> Self {
        let owned: Vec<&Business> = businesses
            .iter()
            .filter(|b| b.owner_user_id == owner_id)
            .collect();
        let review_count = owned.iter().map(|b| b.reviews.len()).sum();
        let average_rating = if owned.is_empty() {
            0.0
        } else {
            let sum: f64 = owned.iter().map(|b| b.average_rating).sum();
            (sum / owned.len() as f64 * 10.0).round() / 10.0
        };
        let active_deals = owned.iter().filter(|b| b.has_deal()).count();
        Self {
            business_count: owned.len(),
            review_count,
            average_rating,
            active_deals,
        }
    }
}
