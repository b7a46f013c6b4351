//! Session storage seam.
//!
//! The surrounding server owns sessions: it decides when they are created,
//! how they are keyed and when they are destroyed. The client only needs to
//! read a [`Credential`] by key and write it back after a refresh, which is
//! all [`SessionStore`] asks for.

use crate::auth::Credential;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key/value access to stored credentials, keyed by an opaque session ID.
pub trait SessionStore: Send + Sync {
    /// Returns the credential stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Credential>;

    /// Stores `credential` under `key`, replacing any previous value.
    fn set(&self, key: &str, credential: Credential);
}

/// A [`SessionStore`] backed by a process-local map.
///
/// A lock poisoned by a panicking writer is recovered rather than treated as
/// empty, so a refreshed credential is never dropped.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use spotify_api::{Credential, InMemorySessionStore, SessionStore};
///
/// let store = InMemorySessionStore::new();
/// let now = Utc::now();
/// store.set("sid-1", Credential::new("access", "refresh", now + Duration::hours(1), now));
///
/// assert_eq!(store.get("sid-1").unwrap().access_token, "access");
/// assert!(store.get("sid-2").is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Credential>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Credential>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Credential>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes and returns the credential stored under `key`.
    pub fn remove(&self, key: &str) -> Option<Credential> {
        self.write().remove(key)
    }

    /// Returns the number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<Credential> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, credential: Credential) {
        self.write().insert(key.to_string(), credential);
    }
}
