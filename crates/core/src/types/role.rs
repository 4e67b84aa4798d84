//! User roles.

use serde::{Deserialize, Serialize};

/// Account role.
///
/// Every account is created as [`Role::User`]. Promotion to [`Role::Admin`]
/// happens out-of-band via the CLI, never through the HTTP surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer account.
    #[default]
    User,
    /// Back-office operator: full catalog and support-channel access.
    Admin,
}

impl Role {
    /// Whether this role carries back-office privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_round_trips() {
        for role in [Role::User, Role::Admin] {
            let parsed: Role = role.to_string().parse().expect("round-trip");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        assert!("super_admin".parse::<Role>().is_err());
    }

    #[test]
    fn default_is_user() {
        assert_eq!(Role::default(), Role::User);
        assert!(!Role::default().is_admin());
    }

    #[test]
    fn serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Admin).expect("serialize"),
            "\"admin\""
        );
    }
}
