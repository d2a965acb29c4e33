//! `merger_view_session`: materializes an entire ordered session once and
//! serves `limit`-sized windows out of it (§4.8).
//!
//! Resolves the §9 "session race" open question as the spec recommends: on
//! a cache miss, the freshly materialized list is used directly as this
//! call's window source instead of immediately re-reading Redis, which
//! would otherwise be vulnerable to a replicated read-after-write
//! returning null. Subsequent calls still go through the store.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::MergerViewSessionConfig;
use crate::cursor::{Cursor, NodeCursor, PageResult};
use crate::error::{FeedError, Result};
use crate::items::{get_key, value_key};
use crate::node::{evaluate, EvalContext};

fn cache_key(cfg: &MergerViewSessionConfig, ctx: &EvalContext<'_>) -> String {
    match ctx.extra.get("custom_view_session_key").and_then(Value::as_str) {
        Some(custom) => format!("{}_{}_{}", cfg.merger_id, ctx.user_id, custom),
        None => format!("{}_{}", cfg.merger_id, ctx.user_id),
    }
}

/// §4.8 deduplication: keep each key's *last* occurrence, in *first-seen*
/// order.
fn dedup(data: Vec<Value>, dedup_key: Option<&str>) -> Result<Vec<Value>> {
    let mut order: Vec<String> = Vec::new();
    let mut last_by_key: HashMap<String, Value> = HashMap::new();

    for item in data {
        let key = match dedup_key {
            None => item.clone(),
            Some(k) => get_key(&item, k)
                .cloned()
                .ok_or_else(|| FeedError::DedupKeyAbsent(k.to_string()))?,
        };
        let key_str = value_key(&key);
        if !last_by_key.contains_key(&key_str) {
            order.push(key_str.clone());
        }
        last_by_key.insert(key_str, item);
    }

    Ok(order
        .into_iter()
        .map(|k| last_by_key.remove(&k).expect("key tracked in `order`"))
        .collect())
}

async fn materialize(cfg: &MergerViewSessionConfig, ctx: &EvalContext<'_>) -> Result<Vec<Value>> {
    let result = evaluate(&cfg.data, ctx, cfg.session_size, &Cursor::empty()).await?;
    if cfg.deduplicate {
        dedup(result.data, cfg.dedup_key.as_deref())
    } else {
        Ok(result.data)
    }
}

pub async fn evaluate(
    cfg: &MergerViewSessionConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    let store = ctx
        .session
        .ok_or_else(|| FeedError::MissingRedis(cfg.merger_id.clone()))?;

    let key = cache_key(cfg, ctx);
    let cursor_reset = !cursor.data.contains_key(&cfg.merger_id);

    let session_data = if !store.exists(&key).await? || cursor_reset {
        let fresh = materialize(cfg, ctx).await?;
        let serialized = serde_json::to_vec(&fresh)?;
        store.set(&key, &serialized, cfg.session_live_time).await?;
        fresh
    } else {
        let bytes = store
            .get(&key)
            .await?
            .ok_or_else(|| FeedError::CacheMissAfterSet(key.clone()))?;
        serde_json::from_slice(&bytes)?
    };

    let page = cursor.get(&cfg.merger_id).page;
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let end = (page as usize).saturating_mul(limit as usize);
    let window_end = end.min(session_data.len());
    let mut window = if start < session_data.len() {
        session_data[start..window_end].to_vec()
    } else {
        Vec::new()
    };

    if cfg.shuffle {
        ctx.shuffler.shuffle(&mut window);
    }

    let has_next_page = session_data.len() > end;

    let mut next_page = Cursor::empty();
    next_page.insert(
        cfg.merger_id.clone(),
        NodeCursor {
            page: page + 1,
            after: None,
        },
    );

    Ok(PageResult {
        data: window,
        next_page,
        has_next_page,
    })
}
