//! Candidate discovery cache
//!
//! The filtered candidate scan is the most expensive read in the system,
//! so its results are cached per user as one hash: field = candidate
//! identity, value = serialized profile snapshot. Invalidation is per
//! candidate — deciding on one profile must not force a rescan for the
//! other nine — and a hash emptied by eviction is deleted outright so an
//! empty-but-present entry can never shadow a recompute.

use crate::store::{CandidateQuery, EphemeralStore, ProfileStore, StoreError};
use std::sync::Arc;
use tracing::debug;
use types::ids::UserId;
use types::profile::UserProfile;

/// Maximum candidates returned by one discovery call.
pub const DISCOVERY_LIMIT: usize = 10;

const CACHE_PREFIX: &str = "discover:";

/// Discovery reads with a per-user snapshot cache in front of the scan.
#[derive(Clone)]
pub struct CandidateDiscovery {
    cache: Arc<dyn EphemeralStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl CandidateDiscovery {
    pub fn new(cache: Arc<dyn EphemeralStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { cache, profiles }
    }

    fn key(user: &UserId) -> String {
        format!("{CACHE_PREFIX}{user}")
    }

    /// Candidates for `user` whose genre tags intersect `genres`.
    ///
    /// Served from the cache when a non-empty entry exists; otherwise
    /// recomputed from the profile store and cached snapshot-by-snapshot.
    /// Results are in identity order either way, so two calls with no
    /// intervening decision return the same list. Cached results may lag
    /// behind newly onboarded profiles until the entry empties out.
    pub async fn discover(
        &self,
        user: &UserId,
        genres: &[String],
    ) -> Result<Vec<UserProfile>, StoreError> {
        let key = Self::key(user);

        let cached = self.cache.hash_get_all(&key).await?;
        if !cached.is_empty() {
            debug!(%user, entries = cached.len(), "discovery served from cache");
            let mut candidates = cached
                .values()
                .map(|snapshot| {
                    serde_json::from_str::<UserProfile>(snapshot).map_err(|e| {
                        StoreError::Corrupt(format!("cached snapshot for {user}: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            candidates.sort_by(|a, b| a.user_id.cmp(&b.user_id));
            return Ok(candidates);
        }

        let requester = self.profiles.fetch(user).await?;
        let mut exclude = vec![user.clone()];
        exclude.extend(requester.matches.iter().cloned());
        exclude.extend(requester.swiped_right.iter().cloned());
        exclude.extend(requester.swiped_left.iter().cloned());

        let query = CandidateQuery {
            exclude,
            genres: genres.to_vec(),
            limit: DISCOVERY_LIMIT,
        };
        let mut candidates = self.profiles.find_candidates(&query).await?;
        candidates.sort_by(|a, b| a.user_id.cmp(&b.user_id));

        debug!(%user, found = candidates.len(), "discovery recomputed from store");
        for candidate in &candidates {
            let snapshot = serde_json::to_string(candidate)
                .map_err(|e| StoreError::Corrupt(format!("snapshot for {user}: {e}")))?;
            self.cache
                .hash_set(&key, candidate.user_id.as_str(), &snapshot)
                .await?;
        }

        Ok(candidates)
    }

    /// Drop `candidate` from `user`'s cached pool.
    ///
    /// Deletes the whole entry when the last snapshot goes, forcing the
    /// next `discover` back to the store.
    pub async fn evict(&self, user: &UserId, candidate: &UserId) -> Result<(), StoreError> {
        let key = Self::key(user);

        if self.cache.hash_exists(&key, candidate.as_str()).await? {
            self.cache.hash_delete(&key, candidate.as_str()).await?;

            if self.cache.hash_get_all(&key).await?.is_empty() {
                self.cache.delete(&key).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryEphemeralStore, MemoryProfileStore};

    fn genres(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn profile(id: &str, tags: &[&str]) -> UserProfile {
        UserProfile::new(UserId::new(id), genres(tags))
    }

    fn setup() -> (Arc<MemoryProfileStore>, CandidateDiscovery) {
        let profiles = Arc::new(MemoryProfileStore::new());
        let discovery = CandidateDiscovery::new(
            Arc::new(MemoryEphemeralStore::new()),
            profiles.clone(),
        );
        (profiles, discovery)
    }

    fn ids(candidates: &[UserProfile]) -> Vec<&str> {
        candidates.iter().map(|p| p.user_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_discover_filters_by_genre_and_excludes_self() {
        let (profiles, discovery) = setup();
        profiles.insert(profile("alice", &["rock"]));
        profiles.insert(profile("bob", &["rock", "jazz"]));
        profiles.insert(profile("carol", &["classical"]));

        let found = discovery
            .discover(&UserId::new("alice"), &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_discover_excludes_decided_candidates() {
        let (profiles, discovery) = setup();
        let mut alice = profile("alice", &["rock"]);
        alice.matches.push(UserId::new("mat"));
        alice.swiped_right.push(UserId::new("right"));
        alice.swiped_left.push(UserId::new("left"));
        profiles.insert(alice);
        for id in ["mat", "right", "left", "fresh"] {
            profiles.insert(profile(id, &["rock"]));
        }

        let found = discovery
            .discover(&UserId::new("alice"), &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_discover_caps_the_pool() {
        let (profiles, discovery) = setup();
        profiles.insert(profile("alice", &["rock"]));
        for n in 0..15 {
            profiles.insert(profile(&format!("candidate-{n:02}"), &["rock"]));
        }

        let found = discovery
            .discover(&UserId::new("alice"), &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(found.len(), DISCOVERY_LIMIT);
    }

    #[tokio::test]
    async fn test_second_discover_is_served_from_cache() {
        let (profiles, discovery) = setup();
        profiles.insert(profile("alice", &["rock"]));
        profiles.insert(profile("bob", &["rock"]));

        let first = discovery
            .discover(&UserId::new("alice"), &genres(&["rock"]))
            .await
            .unwrap();

        // A profile onboarded after population is invisible until the
        // entry is fully consumed.
        profiles.insert(profile("newcomer", &["rock"]));

        let second = discovery
            .discover(&UserId::new("alice"), &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_evict_removes_one_candidate_and_keeps_the_rest() {
        let (profiles, discovery) = setup();
        let alice = UserId::new("alice");
        profiles.insert(profile("alice", &["rock"]));
        profiles.insert(profile("bob", &["rock"]));
        profiles.insert(profile("carol", &["rock"]));

        discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        discovery.evict(&alice, &UserId::new("bob")).await.unwrap();

        // Still cached: the newcomer must not appear yet.
        profiles.insert(profile("newcomer", &["rock"]));
        let found = discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        assert_eq!(ids(&found), vec!["carol"]);
    }

    #[tokio::test]
    async fn test_evicting_last_candidate_forces_recompute() {
        let (profiles, discovery) = setup();
        let alice = UserId::new("alice");
        profiles.insert(profile("alice", &["rock"]));
        profiles.insert(profile("bob", &["rock"]));

        discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        discovery.evict(&alice, &UserId::new("bob")).await.unwrap();

        profiles.insert(profile("newcomer", &["rock"]));
        let found = discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        assert_eq!(ids(&found), vec!["newcomer"]);
    }

    #[tokio::test]
    async fn test_evict_uncached_candidate_is_noop() {
        let (profiles, discovery) = setup();
        let alice = UserId::new("alice");
        profiles.insert(profile("alice", &["rock"]));
        profiles.insert(profile("bob", &["rock"]));

        discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        discovery
            .evict(&alice, &UserId::new("stranger"))
            .await
            .unwrap();

        let found = discovery.discover(&alice, &genres(&["rock"])).await.unwrap();
        assert_eq!(ids(&found), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_discover_unknown_user_errors() {
        let (_, discovery) = setup();
        let err = discovery
            .discover(&UserId::new("ghost"), &genres(&["rock"]))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(UserId::new("ghost")));
    }
}
