//! Sync `SessionStore` backed by `redis::Connection`, for hosts that only
//! have a blocking Redis client on hand (§4.8, §6 "both synchronous and
//! asynchronous client shapes must be accepted").
//!
//! Each call hops onto a blocking thread via `spawn_blocking` so it never
//! stalls the async runtime the node evaluator runs on.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use redis::Commands;

use crate::error::{FeedError, Result};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct RedisSyncStore {
    conn: Arc<Mutex<redis::Connection>>,
}

impl RedisSyncStore {
    pub fn new(conn: redis::Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSyncStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let conn = self.conn.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().expect("redis connection mutex poisoned");
            conn.exists::<_, bool>(key).map_err(FeedError::from)
        })
        .await
        .expect("blocking redis task panicked")
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().expect("redis connection mutex poisoned");
            conn.get::<_, Option<Vec<u8>>>(key).map_err(FeedError::from)
        })
        .await
        .expect("blocking redis task panicked")
    }

    async fn set(&self, key: &str, value: &[u8], ex_seconds: u64) -> Result<()> {
        let conn = self.conn.clone();
        let key = key.to_string();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().expect("redis connection mutex poisoned");
            conn.set_ex::<_, _, ()>(key, value, ex_seconds)
                .map_err(FeedError::from)
        })
        .await
        .expect("blocking redis task panicked")
    }
}
