//! Recursive evaluator for the feed tree.
//!
//! Every node type exposes the same operation — `get_data` (§4.1) — so the
//! tree is evaluated by a single recursive `evaluate` function that matches
//! on the config enum and delegates to a per-node-type module. This keeps
//! the "one method on a tagged variant" shape the design notes call for
//! (§9 "avoid deep class hierarchies") without committing to a vtable: the
//! parsed config is plain data (`FeedNode`), and `evaluate` is the single
//! place that knows how to interpret it.
//!
//! `evaluate` recurses into children through itself, so it is annotated
//! with `#[async_recursion]` — a plain `async fn` calling itself indirectly
//! through a `match` produces an infinitely-sized future otherwise.

pub mod append;
pub mod append_distribute;
pub mod percentage;
pub mod percentage_gradient;
pub mod positional;
pub mod subfeed;
pub mod view_session;

use async_recursion::async_recursion;
use serde_json::{Map, Value};

use crate::config::FeedNode;
use crate::cursor::{Cursor, PageResult};
use crate::error::Result;
use crate::fetcher::FetcherRegistry;
use crate::random::Shuffler;
use crate::session::SessionStore;

/// Everything a node needs to evaluate itself and its children, bundled so
/// adding a new piece of ambient context doesn't change every function
/// signature in the `node` modules.
pub struct EvalContext<'a> {
    pub fetchers: &'a FetcherRegistry,
    pub user_id: &'a str,
    pub extra: &'a Map<String, Value>,
    pub session: Option<&'a dyn SessionStore>,
    pub shuffler: &'a dyn Shuffler,
}

/// Evaluate `node`, producing at most `limit` items (Invariant 6).
#[async_recursion]
pub async fn evaluate<'a>(
    node: &'a FeedNode,
    ctx: &'a EvalContext<'a>,
    limit: u32,
    cursor: &'a Cursor,
) -> Result<PageResult> {
    match node {
        FeedNode::SubFeed(cfg) => subfeed::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::Append(cfg) => append::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::AppendDistribute(cfg) => append_distribute::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::Positional(cfg) => positional::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::Percentage(cfg) => percentage::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::PercentageGradient(cfg) => percentage_gradient::evaluate(cfg, ctx, limit, cursor).await,
        FeedNode::ViewSession(cfg) => view_session::evaluate(cfg, ctx, limit, cursor).await,
    }
}

/// Truncate `data` to `limit` items, the common tail of every merger's
/// `get_data` (Invariant 6: `len(PageResult.data) <= limit` at every node).
pub(crate) fn truncate_to_limit(data: &mut Vec<Value>, limit: u32) {
    let limit = limit as usize;
    if data.len() > limit {
        data.truncate(limit);
    }
}
