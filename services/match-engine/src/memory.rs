//! In-process store backends
//!
//! Lock-guarded maps implementing the store seams. They back the gateway
//! when no Redis or profile service is configured (single-process
//! development) and serve as the doubles for engine and gateway tests.

use crate::store::{
    CandidateQuery, EphemeralStore, MessageStore, ProfileStore, StoreError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use types::ids::UserId;
use types::message::Message;
use types::profile::UserProfile;

// Recover the data on poison instead of panicking; these stores hold no
// invariants that a panicked writer could have broken halfway.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Ephemeral store over in-process hash maps.
#[derive(Default)]
pub struct MemoryEphemeralStore {
    strings: Mutex<HashMap<String, String>>,
    hashes: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl MemoryEphemeralStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EphemeralStore for MemoryEphemeralStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.strings).insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.strings).get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.strings).remove(key);
        Ok(())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.hashes)
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        Ok(lock(&self.hashes).get(key).cloned().unwrap_or_default())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> Result<(), StoreError> {
        let mut hashes = lock(&self.hashes);
        if let Some(hash) = hashes.get_mut(key) {
            hash.remove(field);
            // A hash with no fields ceases to exist, matching Redis.
            if hash.is_empty() {
                hashes.remove(key);
            }
        }
        Ok(())
    }

    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        Ok(lock(&self.hashes)
            .get(key)
            .is_some_and(|hash| hash.contains_key(field)))
    }
}

/// Profile store over an in-process map.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a profile.
    pub fn insert(&self, profile: UserProfile) {
        lock(&self.profiles).insert(profile.user_id.clone(), profile);
    }

    fn update<T>(
        &self,
        user: &UserId,
        mutate: impl FnOnce(&mut UserProfile) -> T,
    ) -> Result<T, StoreError> {
        let mut profiles = lock(&self.profiles);
        let profile = profiles
            .get_mut(user)
            .ok_or_else(|| StoreError::NotFound(user.clone()))?;
        Ok(mutate(profile))
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn fetch(&self, user: &UserId) -> Result<UserProfile, StoreError> {
        lock(&self.profiles)
            .get(user)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user.clone()))
    }

    async fn fetch_many(&self, users: &[UserId]) -> Result<Vec<UserProfile>, StoreError> {
        let profiles = lock(&self.profiles);
        Ok(users
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }

    async fn find_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let profiles = lock(&self.profiles);
        let mut found: Vec<UserProfile> = profiles
            .values()
            .filter(|p| !query.exclude.contains(&p.user_id))
            .filter(|p| p.shares_genre(&query.genres))
            .cloned()
            .collect();
        // Identity order stands in for the scan order of a real store.
        found.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        found.truncate(query.limit);
        Ok(found)
    }

    async fn append_swiped_right(
        &self,
        user: &UserId,
        target: &UserId,
    ) -> Result<(), StoreError> {
        self.update(user, |p| p.swiped_right.push(target.clone()))
    }

    async fn append_swiped_left(
        &self,
        user: &UserId,
        target: &UserId,
    ) -> Result<(), StoreError> {
        self.update(user, |p| p.swiped_left.push(target.clone()))
    }

    async fn append_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError> {
        self.update(user, |p| p.matches.push(other.clone()))
    }

    async fn remove_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError> {
        self.update(user, |p| p.matches.retain(|id| id != other))
    }

    async fn remove_swiped_right(
        &self,
        user: &UserId,
        other: &UserId,
    ) -> Result<(), StoreError> {
        self.update(user, |p| p.swiped_right.retain(|id| id != other))
    }

    async fn add_pending_notification(
        &self,
        user: &UserId,
        sender: &UserId,
    ) -> Result<(), StoreError> {
        self.update(user, |p| {
            if !p.pending_notifications.contains(sender) {
                p.pending_notifications.push(sender.clone());
            }
        })
    }

    async fn remove_pending_notification(
        &self,
        user: &UserId,
        sender: &UserId,
    ) -> Result<(), StoreError> {
        self.update(user, |p| p.pending_notifications.retain(|id| id != sender))
    }

    async fn delete_profile(&self, user: &UserId) -> Result<(), StoreError> {
        lock(&self.profiles)
            .remove(user)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(user.clone()))
    }
}

/// Message store over an in-process vector.
#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        lock(&self.messages).push(message.clone());
        Ok(())
    }

    async fn conversation(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<Vec<Message>, StoreError> {
        Ok(lock(&self.messages)
            .iter()
            .filter(|m| &m.sender == sender && &m.recipient == recipient)
            .cloned()
            .collect())
    }

    async fn purge_conversation(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<(), StoreError> {
        lock(&self.messages).retain(|m| !(&m.sender == sender && &m.recipient == recipient));
        Ok(())
    }
}
