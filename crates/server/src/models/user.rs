//! User model and its public projection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use loomline_core::{Email, Role, UserId};

/// A user account.
///
/// Deliberately not `Serialize`: the password hash must never cross the HTTP
/// boundary. Convert to [`UserPublic`] before putting a user in a response.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub(crate) password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The stored argon2 password hash. Crate-private on purpose.
    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// The projection of a user that is safe to return to clients.
///
/// Applied at every boundary that returns a user object.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar_url: user.avatar_url,
        }
    }
}
