//! The Redis capability contract `merger_view_session` needs, and adapters
//! for the sync and async flavors of the `redis` crate (§4.8, §6, §9
//! "Sync-vs-async Redis client").
//!
//! The engine only ever calls `exists`/`get`/`set`; it never branches on
//! which concrete client backs a `SessionStore` (§9 "do not branch on
//! client type inside node logic").

mod redis_async;
mod redis_sync;

pub use redis_async::RedisAsyncStore;
pub use redis_sync::RedisSyncStore;

use async_trait::async_trait;

use crate::error::Result;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn set(&self, key: &str, value: &[u8], ex_seconds: u64) -> Result<()>;
}
