//! Redis-backed ephemeral store
//!
//! One `ConnectionManager` multiplexes a single connection and
//! reconnects on failure; handles are cheap clones of it, so every
//! operation acquires and releases its own view of the connection.

use async_trait::async_trait;
use match_engine::store::{EphemeralStore, StoreError};
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::collections::HashMap;
use std::time::Duration;

pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(3)
            .set_connection_timeout(Some(Duration::from_millis(500)));

        let client = Client::open(url)?;
        let manager = client.get_connection_manager_with_config(config).await?;

        Ok(Self { manager })
    }
}

fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(key, value).await.map_err(unavailable)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        conn.get(key).await.map_err(unavailable)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await.map_err(unavailable)?;
        Ok(())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.hset(key, field, value).await.map_err(unavailable)?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.manager.clone();
        conn.hgetall(key).await.map_err(unavailable)
    }

    async fn hash_delete(&self, key: &str, field: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.hdel(key, field).await.map_err(unavailable)?;
        Ok(())
    }

    async fn hash_exists(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut conn = self.manager.clone();
        conn.hexists(key, field).await.map_err(unavailable)
    }
}
