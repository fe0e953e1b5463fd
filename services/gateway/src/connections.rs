//! Live connection registry
//!
//! Maps connection ids to the channel draining into each socket's send
//! half. The message router delivers through this registry without ever
//! touching a socket; each socket task owns the receiving end and dies
//! with the connection.

use async_trait::async_trait;
use dashmap::DashMap;
use match_engine::router::{DeliveryError, LiveDelivery};
use tokio::sync::mpsc;
use types::events::ServerEvent;
use types::ids::ConnectionId;

pub struct ConnectionRegistry {
    senders: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            senders: DashMap::new(),
        }
    }

    /// Allocate an id and outbound channel for a freshly upgraded socket.
    pub fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(id, tx);
        (id, rx)
    }

    /// Forget a connection. Events already queued stay in the receiver.
    pub fn remove(&self, id: &ConnectionId) {
        self.senders.remove(id);
    }

    pub fn connected(&self) -> usize {
        self.senders.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveDelivery for ConnectionRegistry {
    async fn deliver(
        &self,
        conn: &ConnectionId,
        event: ServerEvent,
    ) -> Result<(), DeliveryError> {
        let sender = self
            .senders
            .get(conn)
            .ok_or(DeliveryError::Unregistered(*conn))?;
        sender.send(event).map_err(|_| DeliveryError::Closed(*conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;

    fn event() -> ServerEvent {
        ServerEvent::Message {
            body: "hi".to_string(),
            sender: UserId::new("alice"),
        }
    }

    #[tokio::test]
    async fn test_deliver_reaches_the_registered_receiver() {
        let registry = ConnectionRegistry::new();
        let (id, mut rx) = registry.register();

        registry.deliver(&id, event()).await.unwrap();
        assert_eq!(rx.recv().await, Some(event()));
    }

    #[tokio::test]
    async fn test_deliver_to_removed_connection_fails() {
        let registry = ConnectionRegistry::new();
        let (id, _rx) = registry.register();
        registry.remove(&id);

        let err = registry.deliver(&id, event()).await.unwrap_err();
        assert_eq!(err, DeliveryError::Unregistered(id));
        assert_eq!(registry.connected(), 0);
    }

    #[tokio::test]
    async fn test_deliver_to_hung_up_connection_fails() {
        let registry = ConnectionRegistry::new();
        let (id, rx) = registry.register();
        drop(rx);

        let err = registry.deliver(&id, event()).await.unwrap_err();
        assert_eq!(err, DeliveryError::Closed(id));
    }
}
