//! Durable chat message record
//!
//! Messages are persisted and served by the message collaborator; the
//! matching core routes the live event and never inspects bodies.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// One persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: UserId,
    pub recipient: UserId,
    pub body: String,
    /// Unix milliseconds.
    pub sent_at: i64,
}

impl Message {
    pub fn new(
        sender: UserId,
        recipient: UserId,
        body: impl Into<String>,
        sent_at: i64,
    ) -> Self {
        Self {
            sender,
            recipient,
            body: body.into(),
            sent_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = Message::new(UserId::new("a"), UserId::new("b"), "hey", 1708123456789);
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
