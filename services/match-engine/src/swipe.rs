//! Swipe and match state machine
//!
//! Each ordered pair (initiator → target) moves from undecided to either
//! a pending interest or a terminal rejection. The moment both
//! directions hold a pending interest, the pair is promoted to a mutual
//! match and the reciprocated `swiped_right` entry is consumed.
//!
//! Promotion writes the two profile records independently — the backing
//! store has no cross-record transaction. A crash between the writes
//! leaves a one-sided match that is not repaired automatically; callers
//! accept that window.

use crate::discovery::CandidateDiscovery;
use crate::store::{ProfileStore, StoreError};
use std::sync::Arc;
use tracing::info;
use types::ids::UserId;

/// Records decisions and promotes reciprocated interest to a match.
#[derive(Clone)]
pub struct SwipeEngine {
    profiles: Arc<dyn ProfileStore>,
    discovery: CandidateDiscovery,
}

impl SwipeEngine {
    pub fn new(profiles: Arc<dyn ProfileStore>, discovery: CandidateDiscovery) -> Self {
        Self {
            profiles,
            discovery,
        }
    }

    /// Record that `initiator` swiped right on `target`.
    ///
    /// Returns `true` when `target` had already expressed interest and
    /// the pair is now matched on both profiles. The mutual check reads
    /// only `target.swiped_right`; an earlier rejection by the initiator
    /// does not block a later match. Calling twice for the same pair
    /// appends a duplicate pending entry — harmless, and not guarded.
    pub async fn record_interest(
        &self,
        initiator: &UserId,
        target: &UserId,
    ) -> Result<bool, StoreError> {
        // The candidate leaves the pool whatever the outcome below.
        self.discovery.evict(initiator, target).await?;

        let target_profile = self.profiles.fetch(target).await?;

        if target_profile.swiped_right.contains(initiator) {
            // Two independent writes; no transaction spans them.
            self.profiles.append_match(initiator, target).await?;
            self.profiles.append_match(target, initiator).await?;
            self.profiles.remove_swiped_right(target, initiator).await?;
            info!(%initiator, %target, "mutual interest promoted to match");
            return Ok(true);
        }

        self.profiles.append_swiped_right(initiator, target).await?;
        Ok(false)
    }

    /// Record that `initiator` swiped left on `target`.
    ///
    /// Terminal for this direction; `target`'s profile is untouched.
    pub async fn record_rejection(
        &self,
        initiator: &UserId,
        target: &UserId,
    ) -> Result<(), StoreError> {
        self.discovery.evict(initiator, target).await?;
        self.profiles.append_swiped_left(initiator, target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryEphemeralStore, MemoryProfileStore};
    use types::profile::UserProfile;

    fn genres(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    struct Fixture {
        profiles: Arc<MemoryProfileStore>,
        discovery: CandidateDiscovery,
        engine: SwipeEngine,
    }

    fn setup() -> Fixture {
        let profiles = Arc::new(MemoryProfileStore::new());
        let discovery = CandidateDiscovery::new(
            Arc::new(MemoryEphemeralStore::new()),
            profiles.clone(),
        );
        let engine = SwipeEngine::new(profiles.clone(), discovery.clone());
        Fixture {
            profiles,
            discovery,
            engine,
        }
    }

    fn seed(fixture: &Fixture, id: &str) -> UserId {
        let user = UserId::new(id);
        fixture
            .profiles
            .insert(UserProfile::new(user.clone(), genres(&["rock"])));
        user
    }

    #[tokio::test]
    async fn test_first_interest_is_pending() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");

        let matched = fx.engine.record_interest(&alice, &bob).await.unwrap();
        assert!(!matched);

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        assert_eq!(alice_profile.swiped_right, vec![bob.clone()]);
        assert!(alice_profile.matches.is_empty());

        // Target side untouched until reciprocation.
        let bob_profile = fx.profiles.fetch(&bob).await.unwrap();
        assert!(bob_profile.swiped_right.is_empty());
        assert!(bob_profile.matches.is_empty());
    }

    #[tokio::test]
    async fn test_reciprocated_interest_promotes_both_sides() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");

        assert!(!fx.engine.record_interest(&alice, &bob).await.unwrap());
        assert!(fx.engine.record_interest(&bob, &alice).await.unwrap());

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        let bob_profile = fx.profiles.fetch(&bob).await.unwrap();
        assert_eq!(alice_profile.matches, vec![bob.clone()]);
        assert_eq!(bob_profile.matches, vec![alice.clone()]);
        // The reciprocated pending entry is consumed.
        assert!(alice_profile.swiped_right.is_empty());
        assert!(bob_profile.swiped_right.is_empty());
    }

    #[tokio::test]
    async fn test_rejection_touches_only_the_initiator() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");

        fx.engine.record_rejection(&alice, &bob).await.unwrap();

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        assert_eq!(alice_profile.swiped_left, vec![bob.clone()]);

        let bob_profile = fx.profiles.fetch(&bob).await.unwrap();
        assert!(bob_profile.swiped_left.is_empty());
        assert!(bob_profile.matches.is_empty());
    }

    #[tokio::test]
    async fn test_earlier_rejection_does_not_block_a_later_match() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");

        fx.engine.record_rejection(&alice, &bob).await.unwrap();
        assert!(!fx.engine.record_interest(&bob, &alice).await.unwrap());

        // Alice changes her mind; the mutual check reads only
        // bob.swiped_right, so the old rejection is ignored.
        assert!(fx.engine.record_interest(&alice, &bob).await.unwrap());

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        assert_eq!(alice_profile.matches, vec![bob.clone()]);
    }

    #[tokio::test]
    async fn test_repeated_interest_appends_a_duplicate() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");

        fx.engine.record_interest(&alice, &bob).await.unwrap();
        fx.engine.record_interest(&alice, &bob).await.unwrap();

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        assert_eq!(alice_profile.swiped_right, vec![bob.clone(), bob.clone()]);
    }

    #[tokio::test]
    async fn test_missing_target_aborts_without_writes() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let ghost = UserId::new("ghost");

        let err = fx.engine.record_interest(&alice, &ghost).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(ghost));

        let alice_profile = fx.profiles.fetch(&alice).await.unwrap();
        assert!(alice_profile.swiped_right.is_empty());
    }

    #[tokio::test]
    async fn test_decision_evicts_the_cached_candidate() {
        let fx = setup();
        let alice = seed(&fx, "alice");
        let bob = seed(&fx, "bob");
        seed(&fx, "carol");

        let pool = fx
            .discovery
            .discover(&alice, &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(pool.len(), 2);

        fx.engine.record_interest(&alice, &bob).await.unwrap();

        let pool = fx
            .discovery
            .discover(&alice, &genres(&["rock"]))
            .await
            .unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].user_id, UserId::new("carol"));
    }
}

// ── Property-Based Tests ────────────────────────────────────────────
