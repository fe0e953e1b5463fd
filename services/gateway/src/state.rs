//! Shared application state
//!
//! Store handles are constructed once at startup and injected here; the
//! core components all borrow the same handles, so the swipe engine and
//! the discovery cache agree on what is cached.

use crate::config::Config;
use crate::connections::ConnectionRegistry;
use crate::rate_limit::RateLimiter;
use match_engine::store::{EphemeralStore, MessageStore, ProfileStore};
use match_engine::{CandidateDiscovery, MessageRouter, PresenceDirectory, SwipeEngine};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub presence: PresenceDirectory,
    pub discovery: CandidateDiscovery,
    pub swipes: SwipeEngine,
    pub router: MessageRouter,
    pub profiles: Arc<dyn ProfileStore>,
    pub messages: Arc<dyn MessageStore>,
    pub connections: Arc<ConnectionRegistry>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        config: Config,
        ephemeral: Arc<dyn EphemeralStore>,
        profiles: Arc<dyn ProfileStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        let connections = Arc::new(ConnectionRegistry::new());
        let presence = PresenceDirectory::new(ephemeral.clone());
        let discovery = CandidateDiscovery::new(ephemeral, profiles.clone());
        let swipes = SwipeEngine::new(profiles.clone(), discovery.clone());
        let router = MessageRouter::new(presence.clone(), profiles.clone(), connections.clone());

        Self {
            config: Arc::new(config),
            presence,
            discovery,
            swipes,
            router,
            profiles,
            messages,
            connections,
            rate_limiter: Arc::new(RateLimiter::new()),
        }
    }
}
