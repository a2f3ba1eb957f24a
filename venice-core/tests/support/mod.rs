//! In-memory gateway double for exercising the core without a network.

// Each test binary uses a different subset of the helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use shared::models::{Business, BusinessRow, Profile, Review, ReviewRow};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use venice_client::{
    AuthGateway, AuthSession, AuthUser, ClientError, ClientResult, DirectoryGateway,
    ReviewWritePath,
};

/// Install a test subscriber once so `RUST_LOG=debug` surfaces the
/// controller's logs during a failing run.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn remote(operation: &str) -> ClientError {
    ClientError::Remote {
        operation: operation.to_string(),
        status: Some(500),
        message: "injected failure".to_string(),
    }
}

/// Registered account in the fake auth backend
pub struct Account {
    pub password: String,
    pub user: AuthUser,
}

/// Backend double: tables, auth accounts, and failure injection flags.
#[derive(Default)]
pub struct MemoryGateway {
    pub businesses: Mutex<Vec<BusinessRow>>,
    pub reviews: Mutex<Vec<ReviewRow>>,
    pub favorites: Mutex<HashSet<(String, String)>>,
    pub profiles: Mutex<HashMap<String, Profile>>,
    pub accounts: Mutex<HashMap<String, Account>>,
    pub token: Mutex<Option<String>>,

    pub fail_business_fetch: AtomicBool,
    pub fail_review_fetch: AtomicBool,
    pub fail_review_insert: AtomicBool,
    pub fail_favorite_write: AtomicBool,
    pub fail_profile_upsert: AtomicBool,
    pub photo_column: AtomicBool,

    /// Applied (and reset) by the next business fetch, to stage a slow
    /// response racing a fast one.
    pub business_fetch_delay_ms: AtomicU64,

    /// Sign-up plus sign-in calls that reached the "backend"
    pub auth_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        init_tracing();
        Self::default()
    }

    pub fn seed_business(&self, row: BusinessRow) {
        self.businesses.lock().unwrap().push(row);
    }

    pub fn seed_review(&self, row: ReviewRow) {
        self.reviews.lock().unwrap().push(row);
    }

    pub fn seed_account(&self, email: &str, password: &str, user: AuthUser) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
    }

    pub fn seed_profile(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }

    pub fn favorite_pairs(&self) -> HashSet<(String, String)> {
        self.favorites.lock().unwrap().clone()
    }

    fn token_for(user_id: &str) -> String {
        format!("token-{}", user_id)
    }

    fn user_for_token(&self, token: &str) -> Option<AuthUser> {
        let accounts = self.accounts.lock().unwrap();
        accounts
            .values()
            .find(|a| Self::token_for(&a.user.id) == token)
            .map(|a| a.user.clone())
    }
}

#[async_trait]
impl DirectoryGateway for MemoryGateway {
    async fn fetch_all_businesses(&self) -> ClientResult<Vec<Business>> {
        let delay = self.business_fetch_delay_ms.swap(0, Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        if self.fail_business_fetch.load(Ordering::SeqCst) {
            return Err(remote("fetch_businesses"));
        }
        let mut rows: Vec<BusinessRow> = self.businesses.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(Business::from).collect())
    }

    async fn fetch_reviews(
        &self,
        business_ids: &[String],
    ) -> ClientResult<HashMap<String, Vec<Review>>> {
        if business_ids.is_empty() {
            return Ok(HashMap::new());
        }
        if self.fail_review_fetch.load(Ordering::SeqCst) {
            return Err(remote("fetch_reviews"));
        }
        let mut map: HashMap<String, Vec<Review>> = HashMap::new();
        for row in self.reviews.lock().unwrap().iter() {
            if business_ids.contains(&row.business_id) {
                map.entry(row.business_id.clone())
                    .or_default()
                    .push(Review::from(row.clone()));
            }
        }
        Ok(map)
    }

    async fn fetch_favorites(&self, user_id: &str) -> ClientResult<HashSet<String>> {
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .map(|(_, bid)| bid.clone())
            .collect())
    }

    async fn add_favorite(&self, user_id: &str, business_id: &str) -> ClientResult<()> {
        if self.fail_favorite_write.load(Ordering::SeqCst) {
            return Err(remote("add_favorite"));
        }
        self.favorites
            .lock()
            .unwrap()
            .insert((user_id.to_string(), business_id.to_string()));
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, business_id: &str) -> ClientResult<()> {
        if self.fail_favorite_write.load(Ordering::SeqCst) {
            return Err(remote("remove_favorite"));
        }
        self.favorites
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), business_id.to_string()));
        Ok(())
    }

    async fn create_business(&self, business: &Business) -> ClientResult<()> {
        let supported = self.photo_column.load(Ordering::SeqCst);
        self.seed_business(business.to_row(supported));
        Ok(())
    }

    async fn update_business(&self, business: &Business) -> ClientResult<()> {
        let supported = self.photo_column.load(Ordering::SeqCst);
        let mut rows = self.businesses.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == business.id) {
            Some(row) => {
                *row = business.to_row(supported);
                Ok(())
            }
            None => Err(remote("update_business")),
        }
    }

    async fn insert_review(
        &self,
        review: &ReviewRow,
        fallback: &BusinessRow,
    ) -> ClientResult<ReviewWritePath> {
        if self.fail_review_insert.load(Ordering::SeqCst) {
            // Same saga as the network gateway: embed in the business row.
            let mut rows = self.businesses.lock().unwrap();
            match rows.iter_mut().find(|r| r.id == fallback.id) {
                Some(row) => {
                    *row = fallback.clone();
                    Ok(ReviewWritePath::Embedded)
                }
                None => Err(remote("insert_review_embedded")),
            }
        } else {
            self.seed_review(review.clone());
            Ok(ReviewWritePath::Dedicated)
        }
    }

    async fn fetch_profile(&self, user_id: &str) -> ClientResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &Profile) -> ClientResult<()> {
        if self.fail_profile_upsert.load(Ordering::SeqCst) {
            return Err(remote("upsert_profile"));
        }
        self.seed_profile(profile.clone());
        Ok(())
    }

    async fn upload_asset(
        &self,
        folder: &str,
        file_name: &str,
        _bytes: Vec<u8>,
    ) -> ClientResult<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://cdn.test/{}/{}", folder, file_name))
    }

    async fn supports_photo_column(&self) -> bool {
        self.photo_column.load(Ordering::SeqCst)
    }

    async fn set_access_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

#[async_trait]
impl AuthGateway for MemoryGateway {
    async fn auth_sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &serde_json::Value,
    ) -> ClientResult<AuthSession> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let user = AuthUser {
            id: format!("user-{}", self.accounts.lock().unwrap().len() + 1),
            email: email.to_string(),
            user_metadata: metadata.clone(),
        };
        self.seed_account(email, password, user.clone());
        Ok(AuthSession {
            access_token: Self::token_for(&user.id),
            refresh_token: String::new(),
            user,
        })
    }

    async fn auth_sign_in(&self, email: &str, password: &str) -> ClientResult<AuthSession> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(AuthSession {
                access_token: Self::token_for(&account.user.id),
                refresh_token: String::new(),
                user: account.user.clone(),
            }),
            _ => Err(ClientError::Unauthorized),
        }
    }

    async fn auth_sign_out(&self, _access_token: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn auth_get_user(&self, access_token: &str) -> ClientResult<Option<AuthUser>> {
        Ok(self.user_for_token(access_token))
    }

    async fn auth_update_metadata(
        &self,
        access_token: &str,
        metadata: &serde_json::Value,
    ) -> ClientResult<()> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .values_mut()
            .find(|a| MemoryGateway::token_for(&a.user.id) == access_token)
            .ok_or(ClientError::Unauthorized)?;
        if let (Some(target), Some(update)) =
            (account.user.user_metadata.as_object_mut(), metadata.as_object())
        {
            for (key, value) in update {
                target.insert(key.clone(), value.clone());
            }
        } else {
            account.user.user_metadata = metadata.clone();
        }
        Ok(())
    }
}

/// A bare business row with no reviews or photo
pub fn business_row(id: &str, name: &str, owner: &str) -> BusinessRow {
    BusinessRow {
        id: id.to_string(),
        name: name.to_string(),
        category: "Food".to_string(),
        address: "101 W Venice Ave".to_string(),
        short_description: format!("{} desc", name),
        hours: "9-5".to_string(),
        special_deals: String::new(),
        owner_id: owner.to_string(),
        reviews: Vec::new(),
        average_rating: 0.0,
        photo_url: None,
    }
}

pub fn review_row(business_id: &str, user_id: &str, rating: u8) -> ReviewRow {
    ReviewRow {
        business_id: business_id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_id.to_string(),
        rating,
        comment: "a comment".to_string(),
        date: "2025-06-01T00:00:00Z".to_string(),
        avatar: String::new(),
        photo: String::new(),
    }
}
