//! User and profile models

use serde::{Deserialize, Serialize};

/// Avatar used whenever neither a profile row nor the auth metadata
/// carries one.
pub const DEFAULT_AVATAR_URL: &str = "assets/default-avatar.png";

/// Sentinel ID for the non-persisted guest identity.
pub const GUEST_USER_ID: &str = "guest";

/// User role, gating write capabilities everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browse-only, never persisted to the backend
    Guest,
    /// Can review and save favorites
    Patron,
    /// Can additionally list and edit their own businesses
    Owner,
}

impl Role {
    /// Parse a role string from the backend; unknown values fall back to
    /// patron, matching how stored profiles are interpreted.
    pub fn parse_or_patron(s: &str) -> Self {
        match s {
            "guest" => Role::Guest,
            "owner" => Role::Owner,
            _ => Role::Patron,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Patron => "patron",
            Role::Owner => "owner",
        }
    }

    /// Guests are read-only.
    pub fn can_write(&self) -> bool {
        !matches!(self, Role::Guest)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current user held in session state. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: String,
}

impl User {
    /// The non-persisted guest identity.
    pub fn guest() -> Self {
        Self {
            id: GUEST_USER_ID.to_string(),
            name: "Guest".to_string(),
            email: "guest".to_string(),
            role: Role::Guest,
            avatar: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }
}

/// Backend `profiles` row, kept in sync with auth metadata so either
/// source can rebuild the user on sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub email: String,
}

impl Profile {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            avatar: user.avatar.clone(),
            email: user.email.clone(),
        }
    }
}
