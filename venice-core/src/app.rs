//! Command facade
//!
//! [`DirectoryApp`] is the contract the view layer programs against: a
//! read-only snapshot plus the full command set. Every command
//! validates locally first, performs the write, then resyncs — a
//! failed write skips the resync and leaves prior state untouched.

use crate::rating;
use crate::session::{SessionManager, SignInForm, SignUpForm};
use crate::snapshot::Snapshot;
use crate::sync::SyncController;
use crate::verify;
use shared::models::{Business, Review, ReviewRow, Role, User};
use shared::util::now_rfc3339;
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;
use venice_client::{Gateway, ReviewWritePath};

/// Where a photo comes from: nothing, a direct URL, or bytes to upload
#[derive(Debug, Clone)]
pub enum PhotoSource {
    None,
    Url(String),
    Bytes { file_name: String, bytes: Vec<u8> },
}

impl PhotoSource {
    pub fn is_none(&self) -> bool {
        matches!(self, PhotoSource::None)
    }
}

/// Review form input
#[derive(Debug, Clone)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
    /// Typed verification word
    pub verify_word: String,
    pub photo: PhotoSource,
}

/// Add/edit business form input
#[derive(Debug, Clone)]
pub struct BusinessForm {
    /// `Some` when editing an existing business
    pub editing_id: Option<String>,
    pub name: String,
    pub category: String,
    pub address: String,
    pub short_description: String,
    pub hours: String,
    /// Empty when no deal is posted
    pub special_deals: String,
    pub photo: PhotoSource,
}

/// The application facade any UI layer drives
pub struct DirectoryApp {
    gateway: Arc<dyn Gateway>,
    session: SessionManager,
    sync: SyncController,
}

impl DirectoryApp {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            session: SessionManager::new(gateway.clone()),
            sync: SyncController::new(gateway.clone()),
            gateway,
        }
    }

    // ==================== Read side ====================

    /// Current snapshot for rendering
    pub async fn snapshot(&self) -> Snapshot {
        self.sync.snapshot().await
    }

    /// Re-render signal; bumped whenever the snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sync.subscribe()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.current_user().await
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    async fn resync(&self) -> AppResult<()> {
        let user = self.session.current_user().await;
        self.sync.resync(user.as_ref()).await
    }

    // ==================== Session commands ====================

    pub async fn sign_up(&self, form: SignUpForm) -> AppResult<User> {
        let user = self.session.sign_up(form).await?;
        self.resync().await?;
        Ok(user)
    }

    pub async fn sign_in(&self, form: SignInForm) -> AppResult<User> {
        let user = self.session.sign_in(form).await?;
        self.resync().await?;
        Ok(user)
    }

    pub async fn continue_as_guest(&self) -> AppResult<User> {
        let guest = self.session.continue_as_guest().await;
        self.resync().await?;
        Ok(guest)
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.sync.clear().await;
    }

    /// Restore a persisted session on startup, then load data either
    /// way — guests still browse.
    pub async fn restore_session(&self, token: Option<&str>) -> AppResult<Option<User>> {
        let user = match token {
            Some(token) => self.session.restore_session(token).await?,
            None => None,
        };
        self.resync().await?;
        Ok(user)
    }

    // ==================== Mutating commands ====================

    /// Validate and submit a review, preferring the dedicated review
    /// store with the embedded-row fallback.
    pub async fn submit_review(
        &self,
        business_id: &str,
        form: ReviewForm,
    ) -> AppResult<ReviewWritePath> {
        let user = self.require_writer("Sign in to leave a review.").await?;
        if !(1..=5).contains(&form.rating) {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Rating must be between 1 and 5.",
            ));
        }
        if form.comment.trim().is_empty() {
            return Err(AppError::validation("Please add a short comment."));
        }
        if !verify::review_check_passes(&form.verify_word) {
            return Err(AppError::human_check(format!(
                "Verification failed. Type {} to confirm you are human.",
                verify::REVIEW_CHALLENGE
            )));
        }

        let business = self
            .snapshot()
            .await
            .business(business_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Business"))?;

        let photo = self
            .resolve_photo(&format!("reviews/{}", business_id), form.photo)
            .await
            .map_err(|_| {
                AppError::with_message(
                    ErrorCode::UploadFailed,
                    "Could not upload photo. Try a smaller file or use a URL.",
                )
            })?;

        let review = Review {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            rating: form.rating,
            comment: form.comment.trim().to_string(),
            date: now_rfc3339(),
            avatar: user.avatar.clone(),
            photo,
        };
        let row = ReviewRow::new(business_id, &review);

        // The compensating action for the saga: the business row with
        // the review embedded and its rating recomputed.
        let mut fallback = business;
        fallback.reviews.push(review);
        fallback.average_rating = rating::average_rating(&fallback.reviews);
        let photo_supported = self.gateway.supports_photo_column().await;
        let fallback_row = fallback.to_row(photo_supported);

        let path = self.gateway.insert_review(&row, &fallback_row).await?;
        self.resync().await?;
        Ok(path)
    }

    /// Save or remove a favorite; returns the new saved state.
    pub async fn toggle_favorite(&self, business_id: &str) -> AppResult<bool> {
        let user = self.require_writer("Sign in to save favorites.").await?;
        let saved = self
            .snapshot()
            .await
            .favorites
            .get(&user.id)
            .map(|set| set.contains(business_id))
            .unwrap_or(false);

        if saved {
            self.gateway.remove_favorite(&user.id, business_id).await?;
        } else {
            self.gateway.add_favorite(&user.id, business_id).await?;
        }
        self.resync().await?;
        Ok(!saved)
    }

    /// Add a new business or update one owned by the current user.
    /// Returns the business ID.
    pub async fn submit_business(&self, form: BusinessForm) -> AppResult<String> {
        let user = self.current_user().await.ok_or_else(|| {
            AppError::permission_denied("Sign in as a business owner to add businesses.")
        })?;
        if user.role != Role::Owner {
            return Err(AppError::permission_denied(
                "Sign in as a business owner to add businesses.",
            ));
        }
        if form.name.trim().is_empty()
            || form.category.trim().is_empty()
            || form.address.trim().is_empty()
            || form.short_description.trim().is_empty()
            || form.hours.trim().is_empty()
        {
            return Err(AppError::validation(
                "All fields except deals are required.",
            ));
        }
        if !form.address.to_lowercase().contains("venice") {
            return Err(AppError::validation(
                "Address must reference Venice, FL (downtown).",
            ));
        }

        let photo_supported = self.gateway.supports_photo_column().await;
        if !form.photo.is_none() && !photo_supported {
            return Err(AppError::unsupported(
                "Business photos need a photo_url column in the backend. Add it, then try again.",
            ));
        }
        let photo_url = self
            .resolve_photo(&format!("businesses/{}", user.id), form.photo)
            .await
            .map_err(|_| {
                AppError::with_message(
                    ErrorCode::UploadFailed,
                    "Could not upload business photo. Try a smaller file or provide a URL.",
                )
            })?;

        let id = if let Some(editing_id) = form.editing_id {
            let mut business = self
                .snapshot()
                .await
                .business(&editing_id)
                .cloned()
                .ok_or_else(|| AppError::not_found("Business"))?;
            if business.owner_user_id != user.id {
                return Err(AppError::permission_denied(
                    "You can only edit your own business.",
                ));
            }
            business.name = form.name.trim().to_string();
            business.category = form.category.trim().to_string();
            business.address = form.address.trim().to_string();
            business.short_description = form.short_description.trim().to_string();
            business.hours = form.hours.trim().to_string();
            business.special_deals = form.special_deals.trim().to_string();
            if photo_supported && !photo_url.is_empty() {
                business.photo_url = photo_url;
            }
            self.gateway.update_business(&business).await?;
            editing_id
        } else {
            let business = Business {
                id: Uuid::new_v4().to_string(),
                name: form.name.trim().to_string(),
                category: form.category.trim().to_string(),
                address: form.address.trim().to_string(),
                short_description: form.short_description.trim().to_string(),
                hours: form.hours.trim().to_string(),
                special_deals: form.special_deals.trim().to_string(),
                owner_user_id: user.id.clone(),
                reviews: Vec::new(),
                average_rating: 0.0,
                photo_url: if photo_supported { photo_url } else { String::new() },
            };
            self.gateway.create_business(&business).await?;
            business.id
        };

        self.resync().await?;
        Ok(id)
    }

    /// Update the current user's avatar from a URL or uploaded bytes
    pub async fn update_avatar(&self, source: PhotoSource) -> AppResult<User> {
        let user = self
            .current_user()
            .await
            .filter(|u| !u.is_guest())
            .ok_or_else(|| {
                AppError::permission_denied("Sign in to update your profile photo.")
            })?;
        if source.is_none() {
            return Err(AppError::validation(
                "Provide a photo URL or upload an image.",
            ));
        }
        let avatar = self
            .resolve_photo(&format!("avatars/{}", user.id), source)
            .await
            .map_err(|_| {
                AppError::with_message(
                    ErrorCode::UploadFailed,
                    "Could not update photo. Try again.",
                )
            })?;
        let user = self.session.update_avatar(avatar).await?;
        self.resync().await?;
        Ok(user)
    }

    // ==================== Helpers ====================

    /// Current user if they are allowed to write (signed in, not guest)
    async fn require_writer(&self, message: &str) -> AppResult<User> {
        self.current_user()
            .await
            .filter(|u| u.role.can_write())
            .ok_or_else(|| AppError::permission_denied(message))
    }

    /// Turn a photo source into a URL, uploading bytes when needed.
    /// `PhotoSource::None` resolves to an empty string.
    async fn resolve_photo(&self, folder: &str, source: PhotoSource) -> AppResult<String> {
        match source {
            PhotoSource::None => Ok(String::new()),
            PhotoSource::Url(url) => Ok(url.trim().to_string()),
            PhotoSource::Bytes { file_name, bytes } => Ok(self
                .gateway
                .upload_asset(folder, &file_name, bytes)
                .await?),
        }
    }
}
