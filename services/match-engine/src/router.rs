//! Real-time message router
//!
//! Delivers a chat event to the recipient's live connection when one is
//! registered, and otherwise records a content-free pending-notification
//! marker on the recipient's durable profile. There is no acknowledgement
//! channel back to the sender: every failure path is logged and dropped.

use crate::presence::PresenceDirectory;
use crate::store::ProfileStore;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use types::events::ServerEvent;
use types::ids::{ConnectionId, UserId};

/// Failure to hand an event to a live connection.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeliveryError {
    #[error("connection {0} is not registered")]
    Unregistered(ConnectionId),

    #[error("connection {0} hung up")]
    Closed(ConnectionId),
}

/// Targeted send towards one live connection handle.
///
/// Implemented by the gateway's connection registry; the router never
/// learns what a connection actually is.
#[async_trait]
pub trait LiveDelivery: Send + Sync {
    async fn deliver(&self, conn: &ConnectionId, event: ServerEvent)
        -> Result<(), DeliveryError>;
}

/// Routes chat events live-or-deferred.
#[derive(Clone)]
pub struct MessageRouter {
    presence: PresenceDirectory,
    profiles: Arc<dyn ProfileStore>,
    live: Arc<dyn LiveDelivery>,
}

impl MessageRouter {
    pub fn new(
        presence: PresenceDirectory,
        profiles: Arc<dyn ProfileStore>,
        live: Arc<dyn LiveDelivery>,
    ) -> Self {
        Self {
            presence,
            profiles,
            live,
        }
    }

    /// Route one chat event from `sender` to `recipient`.
    ///
    /// Best effort: a reachable recipient gets the event on its
    /// connection, an unreachable one gets `sender` added to its
    /// pending-notification set (at most once). Nothing is reported back.
    pub async fn route(&self, sender: &UserId, recipient: &UserId, body: &str) {
        match self.presence.lookup(recipient).await {
            Ok(Some(conn)) => {
                let event = ServerEvent::Message {
                    body: body.to_string(),
                    sender: sender.clone(),
                };
                match self.live.deliver(&conn, event).await {
                    Ok(()) => debug!(%sender, %recipient, %conn, "chat event delivered live"),
                    Err(err) => warn!(%sender, %recipient, %conn, "live delivery failed: {err}"),
                }
            }
            Ok(None) => {
                if let Err(err) = self
                    .profiles
                    .add_pending_notification(recipient, sender)
                    .await
                {
                    warn!(%sender, %recipient, "pending notification write failed: {err}");
                }
            }
            Err(err) => {
                warn!(%sender, %recipient, "presence lookup failed: {err}");
            }
        }
    }
}
