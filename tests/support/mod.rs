//! Deterministic fetchers shared across the integration tests, grounded on
//! the behavior `tests/fixtures/subfeeds.py`'s `METHODS_DICT` entries exhibit
//! in the reference test suite (`ads`/`followings` generate
//! `"{user_id}_{i}"` sequences honoring `limit_to_return`; `empty` and
//! `error` are self-explanatory).

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use smartfeed::{ClientPage, Fetcher, FetcherRegistry, NodeCursor};

/// Generates `"{user_id}_{i}"` for a one-based, page-windowed range of `i`,
/// honoring an optional `limit_to_return` override the way `SubFeed.get_data`
/// projects declared params onto the client method.
pub struct SequentialFetcher;

#[async_trait]
impl Fetcher for SequentialFetcher {
    fn declared_params(&self) -> &[&str] {
        &["limit_to_return"]
    }

    async fn fetch(
        &self,
        user_id: &str,
        limit: u32,
        next_page: &NodeCursor,
        params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage> {
        let effective_limit = params
            .get("limit_to_return")
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .unwrap_or(limit);

        let page = next_page.page as u64;
        let start = (page - 1) * effective_limit as u64 + 1;
        let end = page * effective_limit as u64;

        let data: Vec<Value> = (start..=end)
            .map(|i| json!(format!("{user_id}_{i}")))
            .collect();
        let after = data.last().cloned();

        Ok(ClientPage {
            data,
            next_page: NodeCursor {
                page: next_page.page + 1,
                after,
            },
            has_next_page: true,
        })
    }
}

/// Always returns an empty, terminal page.
pub struct EmptyFetcher;

#[async_trait]
impl Fetcher for EmptyFetcher {
    async fn fetch(
        &self,
        _user_id: &str,
        _limit: u32,
        next_page: &NodeCursor,
        _params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage> {
        Ok(ClientPage::empty(next_page.clone()))
    }
}

/// Always fails, to exercise `raise_error` handling.
pub struct ErrorFetcher;

#[async_trait]
impl Fetcher for ErrorFetcher {
    async fn fetch(
        &self,
        _user_id: &str,
        _limit: u32,
        _next_page: &NodeCursor,
        _params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage> {
        Err(anyhow::anyhow!("upstream client failure"))
    }
}

/// Cycles through `KEY_SPACE` distinct keys, producing duplicate `key`
/// values across a long-enough page — used to exercise `merger_distribute`'s
/// adjacency guarantee and `merger_view_session`'s deduplication.
pub struct KeyedFetcher {
    pub key_space: u64,
}

static KEYED_CALL_COUNT: AtomicU64 = AtomicU64::new(0);

#[async_trait]
impl Fetcher for KeyedFetcher {
    async fn fetch(
        &self,
        _user_id: &str,
        limit: u32,
        next_page: &NodeCursor,
        _params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage> {
        let page = next_page.page as u64;
        let start = (page - 1) * limit as u64;
        let call = KEYED_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        let data: Vec<Value> = (start..start + limit as u64)
            .map(|i| {
                json!({
                    "key": format!("k{}", i % self.key_space),
                    "seq": i,
                    "call": call,
                })
            })
            .collect();

        Ok(ClientPage {
            data,
            next_page: NodeCursor {
                page: next_page.page + 1,
                after: None,
            },
            has_next_page: true,
        })
    }
}

/// Produces exactly `limit` items with `key` cycling through 3 distinct
/// values, deterministically by position (no shared call counter) — used to
/// exercise `merger_view_session`'s dedup against a single materialization
/// pass.
pub struct KeyedFetcherForSession;

#[async_trait]
impl Fetcher for KeyedFetcherForSession {
    async fn fetch(
        &self,
        _user_id: &str,
        limit: u32,
        next_page: &NodeCursor,
        _params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage> {
        let data: Vec<Value> = (0..limit as u64)
            .map(|i| {
                json!({
                    "key": format!("k{}", i % 3),
                    "seq": i,
                })
            })
            .collect();

        Ok(ClientPage {
            data,
            next_page: NodeCursor {
                page: next_page.page + 1,
                after: None,
            },
            has_next_page: true,
        })
    }
}

pub fn registry() -> FetcherRegistry {
    let mut registry = FetcherRegistry::new();
    registry.register("ads", SequentialFetcher);
    registry.register("followings", SequentialFetcher);
    registry.register("empty", EmptyFetcher);
    registry.register("error", ErrorFetcher);
    registry.register("doubles", KeyedFetcher { key_space: 3 });
    registry
}

pub fn empty_extra() -> Map<String, Value> {
    Map::new()
}
