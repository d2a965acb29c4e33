//! Async `SessionStore` backed by `redis::aio::ConnectionManager`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::Result;
use crate::session::SessionStore;

/// Wraps a `ConnectionManager`, which multiplexes and auto-reconnects
/// under the hood, so a single clone can be shared across concurrently
/// handled requests (§5 "they share only ... the Redis client, which is
/// expected to be safe for concurrent use").
#[derive(Clone)]
pub struct RedisAsyncStore {
    conn: ConnectionManager,
}

impl RedisAsyncStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for RedisAsyncStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        Ok(conn.exists(key).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &[u8], ex_seconds: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ex_seconds).await?;
        Ok(())
    }
}
