//! Store seams for the matching core
//!
//! The durable profile/message store and the ephemeral key-value store
//! are external collaborators. The core sees them only through these
//! traits; handles are constructed once at startup and injected, which
//! keeps every component testable against the in-process backends in
//! [`crate::memory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use types::ids::UserId;
use types::message::Message;
use types::profile::UserProfile;

/// Failures surfaced by a backing store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("profile not found: {0}")]
    NotFound(UserId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("malformed stored record: {0}")]
    Corrupt(String),
}

/// Filter for the candidate discovery scan.
///
/// `exclude` carries the requesting identity plus everything it has
/// already matched with or decided on; the scan returns only profiles
/// whose genre tags intersect `genres`, capped at `limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub exclude: Vec<UserId>,
    pub genres: Vec<String>,
    pub limit: usize,
}

/// Durable profile store.
///
/// Offers point lookups, the filtered candidate scan, and single-field
/// mutations. There is no multi-record transaction: callers sequencing
/// writes across two profiles accept the partial-failure window.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Point lookup by identity.
    async fn fetch(&self, user: &UserId) -> Result<UserProfile, StoreError>;

    /// Bulk lookup; identities without a profile are skipped.
    async fn fetch_many(&self, users: &[UserId]) -> Result<Vec<UserProfile>, StoreError>;

    /// Filtered candidate scan, capped at `query.limit`.
    async fn find_candidates(&self, query: &CandidateQuery)
        -> Result<Vec<UserProfile>, StoreError>;

    /// Append `target` to `user.swiped_right`. Duplicates are not collapsed.
    async fn append_swiped_right(&self, user: &UserId, target: &UserId)
        -> Result<(), StoreError>;

    /// Append `target` to `user.swiped_left`.
    async fn append_swiped_left(&self, user: &UserId, target: &UserId)
        -> Result<(), StoreError>;

    /// Append `other` to `user.matches`.
    async fn append_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError>;

    /// Remove every occurrence of `other` from `user.matches`.
    async fn remove_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError>;

    /// Remove every occurrence of `other` from `user.swiped_right`.
    async fn remove_swiped_right(&self, user: &UserId, other: &UserId)
        -> Result<(), StoreError>;

    /// Add `sender` to `user.pending_notifications` (set union: a sender
    /// already present is not added again).
    async fn add_pending_notification(&self, user: &UserId, sender: &UserId)
        -> Result<(), StoreError>;

    /// Remove `sender` from `user.pending_notifications`.
    async fn remove_pending_notification(&self, user: &UserId, sender: &UserId)
        -> Result<(), StoreError>;

    /// Delete the profile record entirely.
    async fn delete_profile(&self, user: &UserId) -> Result<(), StoreError>;
}

/// Durable message collection. Bodies pass through opaquely.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message.
    async fn append(&self, message: &Message) -> Result<(), StoreError>;

    /// All messages sent by `sender` to `recipient`, in insertion order.
    async fn conversation(&self, sender: &UserId, recipient: &UserId)
        -> Result<Vec<Message>, StoreError>;

    /// Delete all messages sent by `sender` to `recipient`.
    async fn purge_conversation(&self, sender: &UserId, recipient: &UserId)
        -> Result<(), StoreError>;
}

/// Ephemeral key-value store: plain strings plus hashes.
///
/// Nothing stored here survives a restart. Backs the presence directory
/// (string ops) and the discovery cache (hash ops).
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError>;

    /// All fields of a hash; empty map when the key is absent.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    async fn hash_delete(&self, key: &str, field: &str) -> Result<(), StoreError>;

    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError>;
}
