//! Credential lookup over the `users` collection.
//!
//! # Responsibility
//! - Resolve an email/password pair to a password-free profile.
//!
//! # Invariants
//! - Returned profiles never carry the password.
//! - Credentials are compared as plaintext; this is a demo-grade check.
//! - Emails and passwords are never written to logs.

use crate::model::user::{User, UserId, UserProfile};
use crate::store::{Collection, RecordStore, StoreResult};
use log::info;

/// Login service over any record store.
pub struct AuthService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the matching user's profile, or `None` for unknown credentials.
    pub fn authenticate(&self, email: &str, password: &str) -> StoreResult<Option<UserProfile>> {
        let users: Vec<User> = self.store.load(Collection::Users)?;
        let profile = users
            .iter()
            .find(|user| user.matches_credentials(email, password))
            .map(User::profile);

        match &profile {
            Some(found) => info!(
                "event=login module=auth status=ok user_id={} role={}",
                found.id,
                found.role.as_str()
            ),
            None => info!("event=login module=auth status=rejected"),
        }
        Ok(profile)
    }

    /// Looks up one profile by id.
    pub fn find_user(&self, id: UserId) -> StoreResult<Option<UserProfile>> {
        let users: Vec<User> = self.store.load(Collection::Users)?;
        Ok(users.iter().find(|user| user.id == id).map(User::profile))
    }
}
