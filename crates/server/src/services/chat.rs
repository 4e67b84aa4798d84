//! Support chat workflow.
//!
//! Every user gets one support channel, id `support-{user_id}`. Admins are
//! reconciled into the member list on every fetch, so staff hired after a
//! channel was created still see it.

use sqlx::PgPool;
use tracing::{info, instrument};

use loomline_core::{UserId, support_channel_id};

use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::user::User;
use crate::stream::{StreamClient, StreamError, StreamUser};

/// Errors from the support chat workflow.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The requesting user no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Stream API call failed.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Support channel service.
pub struct ChatService<'a> {
    users: UserRepository<'a>,
    stream: &'a StreamClient,
}

impl<'a> ChatService<'a> {
    /// Create a new chat service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, stream: &'a StreamClient) -> Self {
        Self {
            users: UserRepository::new(pool),
            stream,
        }
    }

    /// Mint a Stream user token for the given user.
    ///
    /// The user is upserted to Stream first so the token always refers to an
    /// existing Stream user carrying the current role.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UserNotFound` if the user row is gone, or a
    /// `Stream` error if the upsert or signing fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_token(&self, user_id: UserId) -> Result<String, ChatError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(ChatError::UserNotFound)?;

        self.stream.upsert_users(&[stream_user(&user)]).await?;

        Ok(self.stream.create_user_token(&user.id.to_string())?)
    }

    /// Ensure the user's support channel exists with the user and every
    /// current admin as members, and return its composite id.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::UserNotFound` if the user row is gone, or a
    /// `Stream` error for any upstream failure.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn support_channel(&self, user_id: UserId) -> Result<String, ChatError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(ChatError::UserNotFound)?;

        let admins = self.users.list_admins().await?;

        // Stream must know every participant, with roles current, before any
        // membership change.
        let mut stream_users: Vec<StreamUser> =
            admins.iter().map(stream_user).collect();
        stream_users.push(stream_user(&user));
        self.stream.upsert_users(&stream_users).await?;

        let channel_id = support_channel_id(user.id);
        let expected = expected_members(&user, &admins);

        let state = match self.stream.query_channel(&channel_id).await? {
            Some(state) => {
                let missing: Vec<String> = expected
                    .iter()
                    .filter(|id| !state.member_ids.contains(id))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    info!(channel_id = %channel_id, adding = missing.len(), "Reconciling support channel members");
                    self.stream.add_members(&channel_id, &missing).await?;
                }
                state
            }
            None => {
                info!(channel_id = %channel_id, "Creating support channel");
                self.stream
                    .create_channel(
                        &channel_id,
                        &format!("Support - {}", user.name),
                        &user.id.to_string(),
                        &expected,
                    )
                    .await?
            }
        };

        Ok(state.cid)
    }
}

/// The full member set a support channel should carry.
fn expected_members(user: &User, admins: &[User]) -> Vec<String> {
    let user_id = user.id.to_string();
    let mut members = vec![user_id.clone()];
    for admin in admins {
        let id = admin.id.to_string();
        // An admin opening their own support channel appears once.
        if id != user_id {
            members.push(id);
        }
    }
    members
}

/// Project a database user into its Stream representation.
fn stream_user(user: &User) -> StreamUser {
    StreamUser {
        id: user.id.to_string(),
        name: Some(user.name.clone()),
        role: Some(user.role.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loomline_core::{Email, Role};

    fn user(name: &str, role: Role) -> User {
        User {
            id: UserId::generate(),
            name: name.to_string(),
            email: Email::parse(&format!("{}@example.com", name.to_lowercase()))
                .expect("email"),
            password_hash: String::new(),
            role,
            avatar_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn member_set_is_user_plus_admins() {
        let customer = user("Ada", Role::User);
        let admins = vec![user("Root", Role::Admin), user("Ops", Role::Admin)];

        let members = expected_members(&customer, &admins);
        assert_eq!(members.len(), 3);
        assert_eq!(members[0], customer.id.to_string());
    }

    #[test]
    fn admin_opening_own_channel_is_not_duplicated() {
        let admin = user("Root", Role::Admin);
        let admins = vec![admin.clone()];

        let members = expected_members(&admin, &admins);
        assert_eq!(members, vec![admin.id.to_string()]);
    }

    #[test]
    fn stream_user_carries_role() {
        let admin = user("Root", Role::Admin);
        let projected = stream_user(&admin);
        assert_eq!(projected.role.as_deref(), Some("admin"));
        assert_eq!(projected.id, admin.id.to_string());
    }
}
