//! Wire-level events for the real-time channel
//!
//! Clients send `join`, `leave` and `newMessage`; the server emits
//! `message` to one targeted connection. Every frame is a JSON object
//! tagged by its `event` field.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Events a connected client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Register this connection as the user's live handle.
    Join { user: UserId },
    /// Drop the user's live handle.
    Leave { user: UserId },
    /// Forward a chat message to the recipient.
    NewMessage {
        body: String,
        sender: UserId,
        recipient: UserId,
    },
}

/// Events the server emits to a targeted connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A chat message delivered live. Carries no recipient: it only ever
    /// reaches the recipient's own connection.
    Message { body: String, sender: UserId },
}
