//! Request and response schemas for the HTTP surface
//!
//! Every inbound and outbound shape is an explicit struct validated by
//! serde before it reaches the core.

use serde::{Deserialize, Serialize};
use types::ids::UserId;
use types::message::Message;
use types::profile::UserProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverParams {
    /// Comma-separated genre tags.
    pub genres: String,
}

impl DiscoverParams {
    pub fn genre_list(&self) -> Vec<String> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub candidates: Vec<UserProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub user_id: UserId,
    pub target_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterestResponse {
    pub matched: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedProfilesResponse {
    pub matches: Vec<UserProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClearNotificationRequest {
    pub user_id: UserId,
    pub sender_id: UserId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationParams {
    pub user_id: UserId,
    pub other_id: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub sender: UserId,
    pub recipient: UserId,
    pub body: String,
}
