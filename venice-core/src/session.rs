//! Session & identity manager
//!
//! Owns the single current-user slot and reconciles backend auth state
//! with the local profile record. All form validation happens here,
//! before any network call.

use crate::verify;
use shared::models::{Profile, Role, User, DEFAULT_AVATAR_URL};
use shared::{AppError, AppResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use venice_client::{AuthUser, Gateway};

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No identity
    Anonymous,
    /// A sign-up or sign-in call is in flight
    Authenticating,
    /// Backed by a real auth session
    Authenticated { role: Role },
    /// Local-only guest identity, nothing persisted
    GuestSession,
}

/// Sign-up form input
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Optional avatar URL; the default avatar is used when empty
    pub avatar_url: String,
    /// "I am human" checkbox
    pub human_checked: bool,
    /// Typed challenge phrase
    pub challenge: String,
}

/// Sign-in form input
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    /// Answer to the arithmetic anti-automation check
    pub math_answer: i64,
}

/// Build the current user from a stored profile merged with the auth
/// identity. Precedence per field: stored profile, then auth metadata,
/// then hardcoded default.
pub fn merge_identity(profile: Option<&Profile>, auth: &AuthUser) -> User {
    let profile_field = |get: fn(&Profile) -> &str| {
        profile.map(get).filter(|s| !s.is_empty()).map(str::to_string)
    };
    let name = profile_field(|p| &p.name)
        .or_else(|| auth.metadata_str("name").map(str::to_string))
        .unwrap_or_else(|| auth.email.clone());
    let role = profile_field(|p| &p.role)
        .or_else(|| auth.metadata_str("role").map(str::to_string))
        .map(|r| Role::parse_or_patron(&r))
        .unwrap_or(Role::Patron);
    let avatar = profile_field(|p| &p.avatar)
        .or_else(|| auth.metadata_str("avatar").map(str::to_string))
        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string());
    User {
        id: auth.id.clone(),
        name,
        email: auth.email.clone(),
        role,
        avatar,
    }
}

/// Owns the current-user slot; the only component besides the sync
/// controller that mutates shared state.
pub struct SessionManager {
    gateway: Arc<dyn Gateway>,
    state: RwLock<SessionState>,
    current: RwLock<Option<User>>,
    access_token: RwLock<Option<String>>,
}

impl SessionManager {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(SessionState::Anonymous),
            current: RwLock::new(None),
            access_token: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Validate and create a new account, then the profile record, then
    /// the local session. A profile upsert failure propagates; it never
    /// leaves an auth identity silently treated as a signed-in user.
    pub async fn sign_up(&self, form: SignUpForm) -> AppResult<User> {
        if form.name.trim().is_empty()
            || form.email.trim().is_empty()
            || form.password.trim().is_empty()
            || form.role == Role::Guest
        {
            return Err(AppError::validation(
                "Please fill every field and choose a role.",
            ));
        }
        if !verify::signup_check_passes(form.human_checked, &form.challenge) {
            return Err(AppError::human_check(format!(
                "Verification failed. Please confirm you are human and type {}.",
                verify::SIGNUP_CHALLENGE
            )));
        }

        *self.state.write().await = SessionState::Authenticating;
        let avatar = if form.avatar_url.trim().is_empty() {
            DEFAULT_AVATAR_URL.to_string()
        } else {
            form.avatar_url.trim().to_string()
        };
        let email = form.email.trim().to_lowercase();
        let metadata = serde_json::json!({
            "name": form.name,
            "role": form.role.as_str(),
            "avatar": avatar,
        });

        let session = match self
            .gateway
            .auth_sign_up(&email, form.password.trim(), &metadata)
            .await
        {
            Ok(session) => session,
            Err(err) => {
                *self.state.write().await = SessionState::Anonymous;
                return Err(err.into());
            }
        };

        self.gateway
            .set_access_token(Some(session.access_token.clone()))
            .await;

        let user = User {
            id: session.user.id.clone(),
            name: form.name.trim().to_string(),
            email,
            role: form.role,
            avatar,
        };

        if let Err(err) = self
            .gateway
            .upsert_profile(&Profile::from_user(&user))
            .await
        {
            // Roll the local session back; the caller sees the failure.
            self.gateway.set_access_token(None).await;
            *self.state.write().await = SessionState::Anonymous;
            return Err(err.into());
        }

        *self.access_token.write().await = Some(session.access_token);
        *self.current.write().await = Some(user.clone());
        *self.state.write().await = SessionState::Authenticated { role: user.role };
        tracing::info!(user_id = %user.id, role = %user.role, "signed up");
        Ok(user)
    }

    /// Validate and sign an existing user in, hydrating the current
    /// user via the profile-merge rule.
    pub async fn sign_in(&self, form: SignInForm) -> AppResult<User> {
        if !verify::signin_check_passes(form.math_answer) {
            return Err(AppError::human_check(
                "Bot check failed. 2 + 3 should equal 5.",
            ));
        }

        *self.state.write().await = SessionState::Authenticating;
        let email = form.email.trim().to_lowercase();
        let session = match self.gateway.auth_sign_in(&email, form.password.trim()).await {
            Ok(session) => session,
            Err(venice_client::ClientError::Unauthorized) => {
                *self.state.write().await = SessionState::Anonymous;
                return Err(AppError::invalid_credentials(
                    "Invalid credentials. Please try again or create an account.",
                ));
            }
            Err(err) => {
                *self.state.write().await = SessionState::Anonymous;
                return Err(err.into());
            }
        };

        self.gateway
            .set_access_token(Some(session.access_token.clone()))
            .await;
        let user = self.hydrate_user(&session.user).await;

        *self.access_token.write().await = Some(session.access_token);
        *self.current.write().await = Some(user.clone());
        *self.state.write().await = SessionState::Authenticated { role: user.role };
        tracing::info!(user_id = %user.id, role = %user.role, "signed in");
        Ok(user)
    }

    /// Browse without an account: local identity only, never persisted.
    pub async fn continue_as_guest(&self) -> User {
        let guest = User::guest();
        *self.current.write().await = Some(guest.clone());
        *self.state.write().await = SessionState::GuestSession;
        guest
    }

    /// Clear the local identity and best-effort invalidate the backend
    /// session.
    pub async fn logout(&self) {
        let token = self.access_token.write().await.take();
        *self.current.write().await = None;
        *self.state.write().await = SessionState::Anonymous;
        self.gateway.set_access_token(None).await;
        if let Some(token) = token {
            if let Err(err) = self.gateway.auth_sign_out(&token).await {
                tracing::warn!(error = %err, "backend sign-out failed");
            }
        }
    }

    /// Rebuild the session from a persisted token on startup. Returns
    /// `None` (and stays anonymous) when the token is no longer valid.
    pub async fn restore_session(&self, token: &str) -> AppResult<Option<User>> {
        let auth_user = match self.gateway.auth_get_user(token).await? {
            Some(user) => user,
            None => {
                *self.state.write().await = SessionState::Anonymous;
                return Ok(None);
            }
        };

        self.gateway
            .set_access_token(Some(token.to_string()))
            .await;
        let user = self.hydrate_user(&auth_user).await;

        *self.access_token.write().await = Some(token.to_string());
        *self.current.write().await = Some(user.clone());
        *self.state.write().await = SessionState::Authenticated { role: user.role };
        tracing::info!(user_id = %user.id, "session restored");
        Ok(Some(user))
    }

    /// Persist a new avatar to auth metadata and the profile record,
    /// then patch the in-memory user.
    pub async fn update_avatar(&self, avatar: String) -> AppResult<User> {
        let mut user = match self.current_user().await {
            Some(user) if !user.is_guest() => user,
            _ => {
                return Err(AppError::permission_denied(
                    "Sign in to update your profile photo.",
                ))
            }
        };
        let token = self
            .access_token()
            .await
            .ok_or_else(AppError::not_authenticated)?;

        self.gateway
            .auth_update_metadata(&token, &serde_json::json!({ "avatar": avatar }))
            .await?;
        user.avatar = avatar;
        self.gateway
            .upsert_profile(&Profile::from_user(&user))
            .await?;

        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    /// Profile fetch is best-effort: a missing or unreadable profile
    /// falls back to the auth identity's metadata.
    async fn hydrate_user(&self, auth_user: &AuthUser) -> User {
        let profile = match self.gateway.fetch_profile(&auth_user.id).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch failed");
                None
            }
        };
        merge_identity(profile.as_ref(), auth_user)
    }
}
