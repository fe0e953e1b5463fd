mod auth;
mod config;
mod connections;
mod error;
mod handlers;
mod models;
mod profile_client;
mod rate_limit;
mod redis_store;
mod router;
mod state;

use config::Config;
use match_engine::memory::{MemoryEphemeralStore, MemoryMessageStore, MemoryProfileStore};
use match_engine::store::{EphemeralStore, MessageStore, ProfileStore};
use profile_client::ProfileServiceClient;
use redis_store::RedisStore;
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting gateway service");

    let config = Config::load();

    let ephemeral: Arc<dyn EphemeralStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            tracing::warn!("REDIS_URL not set, using the in-process ephemeral store");
            Arc::new(MemoryEphemeralStore::new())
        }
    };

    let (profiles, messages): (Arc<dyn ProfileStore>, Arc<dyn MessageStore>) =
        match &config.profile_service_url {
            Some(url) => {
                let client = Arc::new(ProfileServiceClient::new(url.clone()));
                (
                    client.clone() as Arc<dyn ProfileStore>,
                    client as Arc<dyn MessageStore>,
                )
            }
            None => {
                tracing::warn!("PROFILE_SERVICE_URL not set, using the in-process profile store");
                (
                    Arc::new(MemoryProfileStore::new()) as Arc<dyn ProfileStore>,
                    Arc::new(MemoryMessageStore::new()) as Arc<dyn MessageStore>,
                )
            }
        };

    let port = config.port;
    let state = AppState::new(config, ephemeral, profiles, messages);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
