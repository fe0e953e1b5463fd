//! Identifier types for users and live connections
//!
//! User identities are opaque strings minted by the credential service;
//! this crate never derives meaning from their contents. Connection ids
//! use UUID v7 so registry dumps sort by connection time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque user identity issued by the credential service.
///
/// Ordered so candidate listings can use identity order as a
/// deterministic tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a UserId from a string identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier for one live WebSocket connection.
///
/// Minted per upgrade; a user reconnecting gets a fresh id and the
/// presence directory overwrites the old one (last writer wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a new ConnectionId with the current timestamp.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display_and_str() {
        let id = UserId::new("spotify:4242");
        assert_eq!(id.as_str(), "spotify:4242");
        assert_eq!(id.to_string(), "spotify:4242");
    }

    #[test]
    fn test_user_id_serialization_is_transparent() {
        let id = UserId::new("alice");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"alice\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_user_id_ordering_is_lexicographic() {
        let a = UserId::new("aaa");
        let b = UserId::new("bbb");
        assert!(a < b);
    }

    #[test]
    fn test_connection_id_uniqueness() {
        let c1 = ConnectionId::new();
        let c2 = ConnectionId::new();
        assert_ne!(c1, c2, "ConnectionIds should be unique");
    }

    #[test]
    fn test_connection_id_string_round_trip() {
        let id = ConnectionId::new();
        let parsed: ConnectionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_connection_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ConnectionId>().is_err());
    }
}
