use std::collections::HashMap;
use std::sync::RwLock;

use nexcrm_core::{DomainError, DomainResult, UserId};
use nexcrm_tenancy::User;

/// Global user registry. Users are not tenant-scoped; email and username are
/// unique across the whole system.
#[derive(Debug, Default)]
pub struct UserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new user, rejecting duplicate email or username.
    pub fn insert(&self, user: User) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("user store lock poisoned"))?;
        if map.values().any(|u| u.email == user.email) {
            return Err(DomainError::conflict("email already registered"));
        }
        if map.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict("username already taken"));
        }
        map.insert(user.id, user);
        Ok(())
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.inner
            .read()
            .ok()?
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Overwrites an existing user record.
    pub fn update(&self, user: User) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("user store lock poisoned"))?;
        if !map.contains_key(&user.id) {
            return Err(DomainError::not_found());
        }
        map.insert(user.id, user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: &str) -> User {
        User::new(email, username, "T", "U", "hash".into()).unwrap()
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = UserStore::new();
        store.insert(user("a@x.test", "a")).unwrap();
        let err = store.insert(user("a@x.test", "b")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let store = UserStore::new();
        store.insert(user("a@x.test", "a")).unwrap();
        let err = store.insert(user("b@x.test", "a")).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn lookup_by_email_is_case_insensitive() {
        let store = UserStore::new();
        store.insert(user("a@x.test", "a")).unwrap();
        assert!(store.find_by_email("A@X.Test").is_some());
    }
}
