//! # User Identity Store
//!
//! Arena of user records keyed by assigned integer id, with a
//! lowercased-email uniqueness index maintained inside the same write lock
//! as the arena itself. Roles are written exactly once, at insert; no
//! method on the store mutates an existing record.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use court_core::Role;

/// A registered user.
///
/// `email` is always the lowercased, normalized form.
/// `password_hash` is an Argon2id PHC string — never the raw credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Errors during identity store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    /// The email is already registered (compared case-insensitively).
    #[error("email {email} is already registered")]
    EmailTaken {
        /// The conflicting (normalized) email.
        email: String,
    },
}

#[derive(Default)]
struct UserArena {
    users: HashMap<i64, User>,
    by_email: HashMap<String, i64>,
    next_id: i64,
}

/// The identity store.
///
/// Users are never deleted, and their role never changes after signup.
pub struct UserStore {
    inner: RwLock<UserArena>,
}

impl UserStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(UserArena { next_id: 1, ..Default::default() }),
        }
    }

    /// Insert a new user.
    ///
    /// `email` must already be normalized (lowercased) by the caller;
    /// uniqueness is checked and the index updated under the write lock,
    /// so two concurrent signups with the same email cannot both succeed.
    ///
    /// # Errors
    ///
    /// [`UserError::EmailTaken`] if the email is already registered.
    pub fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> Result<User, UserError> {
        let mut arena = self.inner.write();
        if arena.by_email.contains_key(&email) {
            return Err(UserError::EmailTaken { email });
        }
        let id = arena.next_id;
        arena.next_id += 1;
        let user = User { id, name, email: email.clone(), password_hash, role };
        arena.by_email.insert(email, id);
        arena.users.insert(id, user.clone());
        Ok(user)
    }

    /// Fetch a user by id.
    pub fn get(&self, id: i64) -> Option<User> {
        self.inner.read().users.get(&id).cloned()
    }

    /// Fetch a user by email, compared case-insensitively.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let arena = self.inner.read();
        let id = arena.by_email.get(&email.trim().to_lowercase())?;
        arena.users.get(id).cloned()
    }

    /// All users, ordered by id. Used by the metrics scrape handler.
    pub fn list(&self) -> Vec<User> {
        let arena = self.inner.read();
        let mut users: Vec<User> = arena.users.values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-insert a persisted user on boot, preserving its id.
    ///
    /// Advances the id sequence past the loaded id so newly created users
    /// never collide with hydrated ones.
    pub fn hydrate(&self, user: User) {
        let mut arena = self.inner.write();
        arena.next_id = arena.next_id.max(user.id + 1);
        arena.by_email.insert(user.email.clone(), user.id);
        arena.users.insert(user.id, user);
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_one() -> (UserStore, User) {
        let store = UserStore::new();
        let user = store
            .create(
                "Ada".into(),
                "ada@example.com".into(),
                "$argon2id$stub".into(),
                Role::Plaintiff,
            )
            .unwrap();
        (store, user)
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let (store, first) = store_with_one();
        let second = store
            .create("Bob".into(), "bob@example.com".into(), "h".into(), Role::Juror)
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (store, user) = store_with_one();
        let err = store
            .create("Other".into(), "ada@example.com".into(), "h".into(), Role::Juror)
            .unwrap_err();
        assert_eq!(err, UserError::EmailTaken { email: user.email });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn lookup_by_email_is_case_insensitive() {
        let (store, user) = store_with_one();
        let found = store.find_by_email("ADA@Example.Com").unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_by_email("nobody@example.com").is_none());
    }

    #[test]
    fn role_is_immutable_after_signup() {
        // The store exposes no mutation path at all: the record returned by
        // `get` is a copy, and writing to it cannot touch the arena.
        let (store, user) = store_with_one();
        let mut copy = store.get(user.id).unwrap();
        copy.role = Role::Judge;
        assert_eq!(store.get(user.id).unwrap().role, Role::Plaintiff);
    }

    #[test]
    fn hydrate_preserves_ids_and_advances_sequence() {
        let store = UserStore::new();
        store.hydrate(User {
            id: 41,
            name: "Restored".into(),
            email: "restored@example.com".into(),
            password_hash: "h".into(),
            role: Role::Judge,
        });
        let fresh = store
            .create("New".into(), "new@example.com".into(), "h".into(), Role::Juror)
            .unwrap();
        assert_eq!(fresh.id, 42);
        assert_eq!(store.find_by_email("restored@example.com").unwrap().id, 41);
    }
}
