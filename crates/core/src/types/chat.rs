//! Chat capability table and support-channel identity.
//!
//! The external chat service receives a capability grant per user describing
//! which channel operations that identity may perform. The grant is a pure
//! function of the account role - no per-request permission objects.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::Role;

/// Capability grant handed to the external chat service.
///
/// Reading, writing, and joining channels is open to everyone; channel
/// administration (create/delete/update/query) is reserved for admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCapabilities {
    pub read_channel: bool,
    pub write_channel: bool,
    pub join_channel: bool,
    pub create_channel: bool,
    pub delete_channel: bool,
    pub update_channel: bool,
    pub query_channels: bool,
}

/// Compute the capability grant for a role. Table-driven and total.
#[must_use]
pub const fn capabilities_for(role: Role) -> ChatCapabilities {
    let admin = role.is_admin();
    ChatCapabilities {
        read_channel: true,
        write_channel: true,
        join_channel: true,
        create_channel: admin,
        delete_channel: admin,
        update_channel: admin,
        query_channels: admin,
    }
}

/// Deterministic support-channel id for a customer.
///
/// One channel per customer, shared with the admin pool. The id is stable
/// across sessions so repeated fetches land on the same conversation.
#[must_use]
pub fn support_channel_id(user_id: UserId) -> String {
    format!("support-{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_can_read_write_join() {
        for role in [Role::User, Role::Admin] {
            let caps = capabilities_for(role);
            assert!(caps.read_channel);
            assert!(caps.write_channel);
            assert!(caps.join_channel);
        }
    }

    #[test]
    fn only_admin_administers_channels() {
        let user = capabilities_for(Role::User);
        assert!(!user.create_channel);
        assert!(!user.delete_channel);
        assert!(!user.update_channel);
        assert!(!user.query_channels);

        let admin = capabilities_for(Role::Admin);
        assert!(admin.create_channel);
        assert!(admin.delete_channel);
        assert!(admin.update_channel);
        assert!(admin.query_channels);
    }

    #[test]
    fn channel_id_is_deterministic() {
        let id = UserId::generate();
        assert_eq!(support_channel_id(id), support_channel_id(id));
        assert_eq!(support_channel_id(id), format!("support-{id}"));
    }

    #[test]
    fn channel_ids_differ_per_user() {
        assert_ne!(
            support_channel_id(UserId::generate()),
            support_channel_id(UserId::generate())
        );
    }
}
