//! Durable user profile record
//!
//! Owned by the profile service; the matching core reads whole profiles
//! and mutates individual fields through the store seam. The decision
//! lists are ordered sequences, `pending_notifications` behaves as a
//! deduplicated set.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// A user's durable profile.
///
/// `swiped_right` holds identities this user expressed interest in that
/// have not yet reciprocated; a reciprocated entry is consumed when the
/// pair is promoted into `matches`. `swiped_left` is terminal for that
/// direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub onboarded: bool,
    #[serde(default)]
    pub matches: Vec<UserId>,
    #[serde(default)]
    pub swiped_right: Vec<UserId>,
    #[serde(default)]
    pub swiped_left: Vec<UserId>,
    #[serde(default)]
    pub pending_notifications: Vec<UserId>,
}

impl UserProfile {
    /// Create a bare profile with no recorded decisions.
    pub fn new(user_id: UserId, genres: Vec<String>) -> Self {
        Self {
            user_id,
            display_name: String::new(),
            genres,
            about: String::new(),
            picture_url: None,
            onboarded: false,
            matches: Vec::new(),
            swiped_right: Vec::new(),
            swiped_left: Vec::new(),
            pending_notifications: Vec::new(),
        }
    }

    /// Whether this user has already matched with or decided on `other`.
    pub fn has_decided_on(&self, other: &UserId) -> bool {
        self.matches.contains(other)
            || self.swiped_right.contains(other)
            || self.swiped_left.contains(other)
    }

    /// Whether any of this profile's genre tags appears in `genres`.
    pub fn shares_genre(&self, genres: &[String]) -> bool {
        self.genres.iter().any(|g| genres.contains(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genres(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_new_profile_has_no_decisions() {
        let profile = UserProfile::new(UserId::new("alice"), genres(&["rock"]));
        assert!(profile.matches.is_empty());
        assert!(profile.swiped_right.is_empty());
        assert!(profile.swiped_left.is_empty());
        assert!(profile.pending_notifications.is_empty());
    }

    #[test]
    fn test_has_decided_on_checks_all_three_lists() {
        let mut profile = UserProfile::new(UserId::new("alice"), genres(&["rock"]));
        profile.matches.push(UserId::new("m"));
        profile.swiped_right.push(UserId::new("r"));
        profile.swiped_left.push(UserId::new("l"));

        assert!(profile.has_decided_on(&UserId::new("m")));
        assert!(profile.has_decided_on(&UserId::new("r")));
        assert!(profile.has_decided_on(&UserId::new("l")));
        assert!(!profile.has_decided_on(&UserId::new("unknown")));
    }

    #[test]
    fn test_shares_genre() {
        let profile = UserProfile::new(UserId::new("bob"), genres(&["rock", "jazz"]));
        assert!(profile.shares_genre(&genres(&["jazz", "metal"])));
        assert!(!profile.shares_genre(&genres(&["classical"])));
        assert!(!profile.shares_genre(&[]));
    }

    #[test]
    fn test_deserializes_with_missing_lists() {
        // Profiles written before a field existed must still load.
        let json = r#"{"user_id":"alice","genres":["rock"]}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.user_id, UserId::new("alice"));
        assert!(profile.matches.is_empty());
        assert!(profile.pending_notifications.is_empty());
        assert!(!profile.onboarded);
    }
}
