//! Presence directory
//!
//! Ephemeral mapping from a user identity to its live connection handle.
//! One handle per user: a second `join` overwrites the first (last
//! writer wins). Entries are dropped on explicit leave or disconnect and
//! do not survive a restart of the backing store.

use crate::store::{EphemeralStore, StoreError};
use std::sync::Arc;
use types::ids::{ConnectionId, UserId};

const PRESENCE_PREFIX: &str = "presence:";

/// Handle to the presence keyspace of the ephemeral store.
#[derive(Clone)]
pub struct PresenceDirectory {
    store: Arc<dyn EphemeralStore>,
}

impl PresenceDirectory {
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    fn key(user: &UserId) -> String {
        format!("{PRESENCE_PREFIX}{user}")
    }

    /// Register `conn` as the user's live handle, replacing any previous one.
    pub async fn join(&self, user: &UserId, conn: &ConnectionId) -> Result<(), StoreError> {
        self.store.set(&Self::key(user), &conn.to_string()).await
    }

    /// The user's current handle, or `None` when unreachable.
    pub async fn lookup(&self, user: &UserId) -> Result<Option<ConnectionId>, StoreError> {
        match self.store.get(&Self::key(user)).await? {
            Some(raw) => raw
                .parse::<ConnectionId>()
                .map(Some)
                .map_err(|e| StoreError::Corrupt(format!("presence entry for {user}: {e}"))),
            None => Ok(None),
        }
    }

    /// Drop the user's handle. No-op when absent.
    pub async fn leave(&self, user: &UserId) -> Result<(), StoreError> {
        self.store.delete(&Self::key(user)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEphemeralStore;

    fn directory() -> PresenceDirectory {
        PresenceDirectory::new(Arc::new(MemoryEphemeralStore::new()))
    }

    #[tokio::test]
    async fn test_lookup_absent_user() {
        let presence = directory();
        assert_eq!(presence.lookup(&UserId::new("alice")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_join_then_lookup() {
        let presence = directory();
        let user = UserId::new("alice");
        let conn = ConnectionId::new();

        presence.join(&user, &conn).await.unwrap();
        assert_eq!(presence.lookup(&user).await.unwrap(), Some(conn));
    }

    #[tokio::test]
    async fn test_second_join_wins() {
        let presence = directory();
        let user = UserId::new("alice");
        let first = ConnectionId::new();
        let second = ConnectionId::new();

        presence.join(&user, &first).await.unwrap();
        presence.join(&user, &second).await.unwrap();
        assert_eq!(presence.lookup(&user).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_leave_removes_entry() {
        let presence = directory();
        let user = UserId::new("alice");

        presence.join(&user, &ConnectionId::new()).await.unwrap();
        presence.leave(&user).await.unwrap();
        assert_eq!(presence.lookup(&user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_leave_absent_is_noop() {
        let presence = directory();
        presence.leave(&UserId::new("nobody")).await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_reported() {
        let store = Arc::new(MemoryEphemeralStore::new());
        store.set("presence:alice", "not-a-uuid").await.unwrap();

        let presence = PresenceDirectory::new(store);
        let err = presence.lookup(&UserId::new("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
