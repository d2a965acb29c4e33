//! `FeedManager`: the crate's single entry point.
//!
//! Parses a config tree once at construction (§3 Lifecycles: "the config
//! tree is parsed once ... and never mutated thereafter") and then answers
//! `get_data` calls by recursing into it. Mirrors the teacher's
//! `PercolateNode` pattern of a thin owning struct holding an `Arc` to
//! immutable parsed state plus the collaborators a request needs.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::FeedConfig;
use crate::cursor::{Cursor, PageResult};
use crate::error::Result;
use crate::fetcher::FetcherRegistry;
use crate::node::{self, EvalContext};
use crate::random::{Shuffler, ThreadRngShuffler};
use crate::session::SessionStore;

/// Builds a `FeedManager`, so callers don't have to remember which pieces
/// are optional (session store, shuffler) and which aren't (fetchers).
pub struct FeedManagerBuilder {
    config: FeedConfig,
    fetchers: FetcherRegistry,
    session: Option<Arc<dyn SessionStore>>,
    shuffler: Arc<dyn Shuffler>,
}

impl FeedManagerBuilder {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            fetchers: FetcherRegistry::new(),
            session: None,
            shuffler: Arc::new(ThreadRngShuffler),
        }
    }

    pub fn with_fetchers(mut self, fetchers: FetcherRegistry) -> Self {
        self.fetchers = fetchers;
        self
    }

    pub fn with_session_store(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_shuffler(mut self, shuffler: Arc<dyn Shuffler>) -> Self {
        self.shuffler = shuffler;
        self
    }

    pub fn build(self) -> FeedManager {
        FeedManager {
            config: Arc::new(self.config),
            fetchers: Arc::new(self.fetchers),
            session: self.session,
            shuffler: self.shuffler,
        }
    }
}

/// Evaluates a single parsed feed tree against repeated `get_data` calls.
/// Cheap to clone: every field is an `Arc` or a `Clone`-able handle, so a
/// host can hand one `FeedManager` to every request without re-parsing
/// config or re-registering fetchers (§5 Concurrency: "one `FeedManager`
/// instance is expected to serve many concurrent `get_data` calls").
#[derive(Clone)]
pub struct FeedManager {
    config: Arc<FeedConfig>,
    fetchers: Arc<FetcherRegistry>,
    session: Option<Arc<dyn SessionStore>>,
    shuffler: Arc<dyn Shuffler>,
}

impl FeedManager {
    pub fn builder(config: FeedConfig) -> FeedManagerBuilder {
        FeedManagerBuilder::new(config)
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    /// Evaluate the whole feed tree for `user_id`, returning at most `limit`
    /// items (§4.1, the top-level `get_data` contract every node type also
    /// implements internally).
    pub async fn get_data(
        &self,
        user_id: &str,
        limit: u32,
        cursor: &Cursor,
        extra: &Map<String, Value>,
    ) -> Result<PageResult> {
        let ctx = EvalContext {
            fetchers: &self.fetchers,
            user_id,
            extra,
            session: self.session.as_deref(),
            shuffler: self.shuffler.as_ref(),
        };
        node::evaluate(&self.config.feed, &ctx, limit, cursor).await
    }
}
