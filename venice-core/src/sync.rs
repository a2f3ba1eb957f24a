//! Synchronization controller
//!
//! The single point that mutates the shared snapshot. `resync` is a
//! full refetch-and-recompute cycle; every mutating user action writes
//! first and then resyncs, so the UI never diverges from backend truth
//! after a successful write.

use crate::rating;
use crate::snapshot::Snapshot;
use shared::models::User;
use shared::AppResult;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use venice_client::Gateway;

/// Owns the shared snapshot and serializes updates to it.
///
/// Concurrent resyncs are sequence-stamped: each call takes a ticket at
/// start, and a result is only published if no newer resync has started
/// by publish time. A late-arriving earlier response can never
/// overwrite a later one.
pub struct SyncController {
    gateway: Arc<dyn Gateway>,
    snapshot: RwLock<Snapshot>,
    tickets: AtomicU64,
    generation: watch::Sender<u64>,
}

impl SyncController {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            gateway,
            snapshot: RwLock::new(Snapshot::default()),
            tickets: AtomicU64::new(0),
            generation,
        }
    }

    /// Current snapshot, cloned for rendering
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Subscribe to snapshot generations; receivers re-render on change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Fetch businesses and reviews, recompute ratings, refresh the
    /// current user's favorites, and atomically replace the snapshot.
    ///
    /// Partial-failure policy: a failed business fetch propagates and
    /// empties the collection (stale data is never kept); failed review
    /// or favorites fetches degrade to empty results with a warning.
    pub async fn resync(&self, current_user: Option<&User>) -> AppResult<()> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;

        let mut businesses = match self.gateway.fetch_all_businesses().await {
            Ok(businesses) => businesses,
            Err(err) => {
                tracing::error!(error = %err, "business fetch failed");
                self.publish(ticket, |snap| {
                    snap.businesses.clear();
                    snap.current_user = current_user.cloned();
                })
                .await;
                return Err(err.into());
            }
        };

        let ids: Vec<String> = businesses.iter().map(|b| b.id.clone()).collect();
        match self.gateway.fetch_reviews(&ids).await {
            Ok(mut review_map) => {
                for business in &mut businesses {
                    // Businesses without dedicated rows keep whatever the
                    // legacy embedded collection carried (the degraded
                    // review write path lands there).
                    if let Some(reviews) = review_map.remove(&business.id) {
                        business.reviews = reviews;
                    }
                    business.average_rating = rating::average_rating(&business.reviews);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "review fetch failed; rendering without reviews");
                for business in &mut businesses {
                    business.reviews.clear();
                    business.average_rating = 0.0;
                }
            }
        }

        let favorites_entry = match current_user {
            Some(user) if !user.is_guest() => {
                match self.gateway.fetch_favorites(&user.id).await {
                    Ok(favorites) => Some((user.id.clone(), favorites)),
                    Err(err) => {
                        tracing::warn!(error = %err, "favorites fetch failed");
                        Some((user.id.clone(), Default::default()))
                    }
                }
            }
            _ => None,
        };

        let published = self
            .publish(ticket, move |snap| {
                snap.businesses = businesses;
                snap.current_user = current_user.cloned();
                if let Some((user_id, favorites)) = favorites_entry {
                    snap.favorites.insert(user_id, favorites);
                }
            })
            .await;
        if !published {
            tracing::debug!(ticket, "stale resync discarded");
        }
        Ok(())
    }

    /// Drop everything local (logout path)
    pub async fn clear(&self) {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(ticket, |snap| *snap = Snapshot::default()).await;
    }

    /// Apply `update` under the write lock unless a newer resync has
    /// started since `ticket` was taken. The staleness check and the
    /// swap happen under the same lock, so they are atomic.
    async fn publish<F: FnOnce(&mut Snapshot)>(&self, ticket: u64, update: F) -> bool {
        let mut snap = self.snapshot.write().await;
        if self.tickets.load(Ordering::SeqCst) != ticket {
            return false;
        }
        update(&mut snap);
        drop(snap);
        self.generation.send_modify(|gen| *gen += 1);
        true
    }
}
