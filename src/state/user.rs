//! Signed-in user state mirrored to local persistent storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the only place the router reads the current user from. It is
//! restored before the router exists, so navigation never has to reach into
//! storage on its own.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never escape: writes still update memory and log a
//! warning, and a failed or corrupt restore leaves the user absent. Restore
//! reports which of those happened through [`RestoreOutcome`].

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use crate::net::types::User;
use crate::util::storage::Storage;

/// Storage key holding the JSON-serialized user.
pub const USER_STORAGE_KEY: &str = "user";

/// What [`UserStore::restore_from_storage`] found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// A valid user was loaded into memory.
    Restored,
    /// Nothing was stored.
    Absent,
    /// Stored text did not parse as a user; memory is now empty.
    Corrupt,
    /// Storage could not be read; memory is now empty.
    Unavailable,
}

/// Current user held in memory and mirrored to `storage`.
#[derive(Debug)]
pub struct UserStore<S> {
    user: Option<User>,
    storage: S,
}

impl<S: Storage> UserStore<S> {
    /// Empty store over `storage`; nothing is read yet.
    pub fn new(storage: S) -> Self {
        Self { user: None, storage }
    }

    /// Store over `storage` with the persisted user already loaded.
    pub fn restored(storage: S) -> (Self, RestoreOutcome) {
        let mut store = Self::new(storage);
        let outcome = store.restore_from_storage();
        (store, outcome)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Replace the current user and persist it.
    pub fn set_user(&mut self, user: User) {
        match serde_json::to_string(&user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(USER_STORAGE_KEY, &raw) {
                    tracing::warn!(error = %e, "failed to persist user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize user"),
        }
        tracing::debug!(user_id = user.id, role = user.role, "user set");
        self.user = Some(user);
    }

    /// Forget the current user in memory and in storage.
    pub fn clear_user(&mut self) {
        self.user = None;
        if let Err(e) = self.storage.remove_item(USER_STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to remove persisted user");
        }
        tracing::debug!("user cleared");
    }

    /// Load the persisted user into memory, replacing whatever was there.
    pub fn restore_from_storage(&mut self) -> RestoreOutcome {
        let (user, outcome) = match self.storage.get_item(USER_STORAGE_KEY) {
            Ok(None) => (None, RestoreOutcome::Absent),
            Ok(Some(raw)) => parse_persisted(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "persisted user unreadable");
                (None, RestoreOutcome::Unavailable)
            }
        };
        self.user = user;
        outcome
    }
}

fn parse_persisted(raw: &str) -> (Option<User>, RestoreOutcome) {
    // A stored `null` counts as no user, not as corruption.
    match serde_json::from_str::<Option<User>>(raw) {
        Ok(Some(user)) => (Some(user), RestoreOutcome::Restored),
        Ok(None) => (None, RestoreOutcome::Absent),
        Err(e) => {
            tracing::warn!(error = %e, "persisted user is corrupt");
            (None, RestoreOutcome::Corrupt)
        }
    }
}
