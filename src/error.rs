//! Error types for the feed-assembly engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("invalid feed configuration: {0}")]
    ConfigInvalid(String),

    #[error("merger {0:?} requires a configured session store")]
    MissingRedis(String),

    #[error("fetcher not registered: {0:?}")]
    FetcherMissing(String),

    #[error("fetcher {0:?} returned a malformed client page")]
    FetcherReturnedWrongShape(String),

    #[error("fetcher {0:?} raised: {1}")]
    FetcherRaised(String, #[source] anyhow::Error),

    #[error("deduplication failed: item has no key or attribute {0:?}")]
    DedupKeyAbsent(String),

    #[error("session cache returned no data immediately after writing it (key {0:?})")]
    CacheMissAfterSet(String),

    #[error("session store error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cursor decode error: {0}")]
    CursorDecode(String),
}
