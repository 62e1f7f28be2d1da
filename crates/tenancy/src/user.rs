use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexcrm_core::{DomainError, DomainResult, UserId};

/// An authenticatable account. Not tenant-scoped: a user may belong to many
/// organizations through memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// PHC hash string; never serialized out.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Validates and normalizes identity fields. Email is lowercased; all
    /// fields are trimmed.
    pub fn new(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        password_hash: String,
    ) -> DomainResult<Self> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: UserId::new(),
            email,
            username: username.to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            password_hash,
            is_active: true,
            is_verified: false,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_normalizes_email() {
        let user = User::new("  Alice@Example.COM ", "alice", "Alice", "Smith", "h".into())
            .unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.is_active);
        assert!(!user.is_verified);
    }

    #[test]
    fn invalid_email_is_rejected() {
        assert!(User::new("not-an-email", "bob", "Bob", "J", "h".into()).is_err());
        assert!(User::new("", "bob", "Bob", "J", "h".into()).is_err());
    }

    #[test]
    fn empty_username_is_rejected() {
        assert!(User::new("bob@example.com", "  ", "Bob", "J", "h".into()).is_err());
    }
}
