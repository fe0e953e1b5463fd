//! Shared types for the matching and messaging service
//!
//! Every crate in the repository speaks these types: opaque identifiers,
//! the durable profile and message records, and the real-time wire
//! events. No business logic lives here.
//!
//! # Modules
//! - `ids`: identifier newtypes (UserId, ConnectionId)
//! - `profile`: the durable user profile record
//! - `message`: the durable chat message record
//! - `events`: client/server events on the real-time channel

pub mod events;
pub mod ids;
pub mod message;
pub mod profile;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::events::*;
    pub use crate::ids::*;
    pub use crate::message::*;
    pub use crate::profile::*;
}
