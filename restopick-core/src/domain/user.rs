//! User domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::result::{Error, Result};

/// Avatar shown for users who log in with a free-form identity
pub const DEFAULT_AVATAR: &str =
    "https://images.unsplash.com/photo-1511367461735-48a90e2f7338?w=400&h=400&fit=crop";

/// A person taking part in the lunch vote (the session user or a colleague)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
        }
    }

    /// Build a session user from a free-form login identity
    ///
    /// The display name is the local part of an email-like input (everything
    /// before the first `@`), or the whole input when there is no `@` or the
    /// local part is empty. A fresh id is generated on every login.
    pub fn from_identity(identity: &str) -> Result<Self> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(Error::validation("login identity must not be empty"));
        }

        let name = match identity.split_once('@') {
            Some((local, _)) if !local.is_empty() => local,
            _ => identity,
        };

        Ok(Self::new(
            Uuid::new_v4().to_string(),
            name,
            identity,
            DEFAULT_AVATAR,
        ))
    }

    /// The fixed demo identity offered on the login screen
    pub fn demo() -> Self {
        Self::new("0", "Demo User", "demo@company.com", DEFAULT_AVATAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_uses_local_part_as_name() {
        let user = User::from_identity("alice.martin@company.com").unwrap();
        assert_eq!(user.name, "alice.martin");
        assert_eq!(user.email, "alice.martin@company.com");
        assert_eq!(user.avatar, DEFAULT_AVATAR);
        assert!(Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn test_identity_without_at_sign() {
        let user = User::from_identity("  bob  ").unwrap();
        assert_eq!(user.name, "bob");
        assert_eq!(user.email, "bob");
    }

    #[test]
    fn test_identity_with_empty_local_part() {
        let user = User::from_identity("@corp.com").unwrap();
        assert_eq!(user.name, "@corp.com");
        assert_eq!(user.email, "@corp.com");
    }

    #[test]
    fn test_identity_ids_are_fresh() {
        let a = User::from_identity("same@company.com").unwrap();
        let b = User::from_identity("same@company.com").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_blank_identity_rejected() {
        let err = User::from_identity("   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_demo_user() {
        let user = User::demo();
        assert_eq!(user.id, "0");
        assert_eq!(user.name, "Demo User");
    }
}
