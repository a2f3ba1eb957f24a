//! View projection
//!
//! Pure `snapshot → view-model` functions. No I/O and no DOM coupling:
//! any UI layer (web, native, terminal) can subscribe to snapshot
//! changes and render these models.

use crate::rating::OwnerStats;
use crate::snapshot::Snapshot;
use serde::Serialize;
use shared::models::{Business, Role, DEFAULT_AVATAR_URL};

/// Sort order for the business list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Highest average rating first
    #[default]
    Rating,
    /// Most reviews first
    Reviews,
    /// Name ascending
    Alphabetical,
}

/// Filter and sort controls for the business list
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive match against name and description
    pub search: String,
    /// `None` shows all categories
    pub category: Option<String>,
    pub sort: SortMode,
}

/// One business as the list renders it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub short_description: String,
    /// One-decimal display string, e.g. "4.5"
    pub rating_display: String,
    pub review_count: usize,
    pub has_deal: bool,
    pub photo_url: String,
    /// Whether the current user has saved this business
    pub is_favorite: bool,
    /// Whether the current user may edit this business
    pub can_edit: bool,
}

/// Owner dashboard view-model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerDashboard {
    pub stats: OwnerStats,
    pub businesses: Vec<BusinessCard>,
}

fn card(snapshot: &Snapshot, business: &Business) -> BusinessCard {
    let can_edit = snapshot
        .current_user
        .as_ref()
        .map(|u| u.role == Role::Owner && business.owner_user_id == u.id)
        .unwrap_or(false);
    BusinessCard {
        id: business.id.clone(),
        name: business.name.clone(),
        category: business.category.clone(),
        address: business.address.clone(),
        short_description: business.short_description.clone(),
        rating_display: format!("{:.1}", business.average_rating),
        review_count: business.reviews.len(),
        has_deal: business.has_deal(),
        photo_url: business.photo_url.clone(),
        is_favorite: snapshot.is_favorite(&business.id),
        can_edit,
    }
}

/// The main business list, filtered and sorted
pub fn business_cards(snapshot: &Snapshot, filter: &ListFilter) -> Vec<BusinessCard> {
    let search = filter.search.to_lowercase();
    let mut matched: Vec<&Business> = snapshot
        .businesses
        .iter()
        .filter(|b| {
            let matches_search = search.is_empty()
                || b.name.to_lowercase().contains(&search)
                || b.short_description.to_lowercase().contains(&search);
            let matches_category = filter
                .category
                .as_ref()
                .map(|c| &b.category == c)
                .unwrap_or(true);
            matches_search && matches_category
        })
        .collect();

    match filter.sort {
        SortMode::Rating => matched.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortMode::Reviews => matched.sort_by(|a, b| b.reviews.len().cmp(&a.reviews.len())),
        SortMode::Alphabetical => {
            matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
    }

    matched.into_iter().map(|b| card(snapshot, b)).collect()
}

/// Saved businesses only, for the favorites view
pub fn favorites_view(snapshot: &Snapshot) -> Vec<BusinessCard> {
    let saved = snapshot.favorites_for_current_user();
    snapshot
        .businesses
        .iter()
        .filter(|b| saved.contains(&b.id))
        .map(|b| card(snapshot, b))
        .collect()
}

/// Stats and editable cards for the signed-in owner; `None` for
/// everyone else.
pub fn owner_dashboard(snapshot: &Snapshot) -> Option<OwnerDashboard> {
    let owner = snapshot
        .current_user
        .as_ref()
        .filter(|u| u.role == Role::Owner)?;
    let stats = OwnerStats::compute(&snapshot.businesses, &owner.id);
    let businesses = snapshot
        .businesses
        .iter()
        .filter(|b| b.owner_user_id == owner.id)
        .map(|b| card(snapshot, b))
        .collect();
    Some(OwnerDashboard { stats, businesses })
}

/// Fallback chain for avatar display
pub fn avatar_or_default(avatar: &str) -> &str {
    if avatar.is_empty() {
        DEFAULT_AVATAR_URL
    } else {
        avatar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Review, User};
    use std::collections::{HashMap, HashSet};

    fn business(id: &str, name: &str, category: &str, ratings: &[u8]) -> Business {
        let reviews: Vec<Review> = ratings
            .iter()
            .map(|r| Review {
                user_id: "u".to_string(),
                user_name: "U".to_string(),
                rating: *r,
                comment: "c".to_string(),
                date: "2025-06-01T00:00:00Z".to_string(),
                avatar: String::new(),
                photo: String::new(),
            })
            .collect();
        let average = crate::rating::average_rating(&reviews);
        Business {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            address: "Venice".to_string(),
            short_description: format!("{} desc", name),
            hours: "9-5".to_string(),
            special_deals: String::new(),
            owner_user_id: "owner1".to_string(),
            reviews,
            average_rating: average,
            photo_url: String::new(),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            businesses: vec![
                business("a", "Ale House", "Food", &[3]),
                business("b", "Bakery", "Food", &[5, 5]),
                business("c", "Candles", "Retail", &[4]),
            ],
            favorites: HashMap::new(),
            current_user: None,
        }
    }

    #[test]
    fn test_sort_by_rating_descending() {
        let cards = business_cards(&snapshot(), &ListFilter::default());
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Bakery", "Candles", "Ale House"]);
        assert_eq!(cards[0].rating_display, "5.0");
    }

    #[test]
    fn test_sort_by_review_count() {
        let filter = ListFilter {
            sort: SortMode::Reviews,
            ..Default::default()
        };
        let cards = business_cards(&snapshot(), &filter);
        assert_eq!(cards[0].name, "Bakery");
        assert_eq!(cards[0].review_count, 2);
    }

    #[test]
    fn test_search_matches_name_and_description() {
        let filter = ListFilter {
            search: "BAKERY".to_string(),
            ..Default::default()
        };
        let cards = business_cards(&snapshot(), &filter);
        assert_eq!(cards.len(), 1);

        let filter = ListFilter {
            search: "candles desc".to_string(),
            ..Default::default()
        };
        assert_eq!(business_cards(&snapshot(), &filter).len(), 1);
    }

    #[test]
    fn test_category_filter() {
        let filter = ListFilter {
            category: Some("Retail".to_string()),
            sort: SortMode::Alphabetical,
            ..Default::default()
        };
        let cards = business_cards(&snapshot(), &filter);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Candles");
    }

    #[test]
    fn test_favorites_view_only_saved() {
        let mut snap = snapshot();
        snap.current_user = Some(User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "a@b.c".to_string(),
            role: Role::Patron,
            avatar: String::new(),
        });
        snap.favorites
            .insert("u1".to_string(), HashSet::from(["b".to_string()]));
        let cards = favorites_view(&snap);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "b");
        assert!(cards[0].is_favorite);
    }

    #[test]
    fn test_owner_dashboard_gated_by_role() {
        let mut snap = snapshot();
        assert!(owner_dashboard(&snap).is_none());

        snap.current_user = Some(User {
            id: "owner1".to_string(),
            name: "O".to_string(),
            email: "o@b.c".to_string(),
            role: Role::Owner,
            avatar: String::new(),
        });
        let dashboard = owner_dashboard(&snap).unwrap();
        assert_eq!(dashboard.stats.business_count, 3);
        assert!(dashboard.businesses.iter().all(|c| c.can_edit));
    }

    #[test]
    fn test_avatar_fallback() {
        assert_eq!(avatar_or_default(""), DEFAULT_AVATAR_URL);
        assert_eq!(avatar_or_default("me.png"), "me.png");
    }
}
