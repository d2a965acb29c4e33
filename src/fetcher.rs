//! The host-provided leaf-fetcher contract.
//!
//! A fetcher is a reentrant, named callable the engine invokes from a
//! `SubFeed` node. It is the one collaborator the core never implements
//! itself (§1 "Explicitly out of scope").

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::cursor::{ClientPage, NodeCursor};

/// One host-provided data source, named in config via `method_name`.
///
/// `declared_params` stands in for the reflection-based parameter
/// projection the Python reference implementation does with
/// `inspect.getfullargspec` (§4.2, §9 "Pass-through extra"): in a
/// statically-typed target the fetcher declares up front which keys of
/// `extra` it wants, and the engine projects against that declared set
/// before overlaying the node's static `subfeed_params`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Parameter names this fetcher reads out of `extra`. An empty slice
    /// means the fetcher ignores `extra` entirely.
    fn declared_params(&self) -> &[&str] {
        &[]
    }

    async fn fetch(
        &self,
        user_id: &str,
        limit: u32,
        next_page: &NodeCursor,
        params: &Map<String, Value>,
    ) -> anyhow::Result<ClientPage>;
}

/// `method_name -> Fetcher` lookup table, built once by the host and
/// handed to the `FeedManager`.
#[derive(Default)]
pub struct FetcherRegistry {
    fetchers: HashMap<String, Box<dyn Fetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, method_name: impl Into<String>, fetcher: impl Fetcher + 'static) {
        self.fetchers.insert(method_name.into(), Box::new(fetcher));
    }

    pub fn get(&self, method_name: &str) -> Option<&dyn Fetcher> {
        self.fetchers.get(method_name).map(|f| f.as_ref())
    }
}

/// Project `extra` down to the keys a fetcher declared, then overlay the
/// node's static `subfeed_params` — static wins on key conflict. This is
/// the "intersection of extra with the fetcher's declared parameter names
/// plus the static overlay" rule from §4.2.
pub fn project_params(
    extra: &Map<String, Value>,
    declared: &[&str],
    subfeed_params: &Map<String, Value>,
) -> Map<String, Value> {
    let mut params = Map::new();
    for key in declared {
        if let Some(value) = extra.get(*key) {
            params.insert((*key).to_string(), value.clone());
        }
    }
    for (key, value) in subfeed_params {
        params.insert(key.clone(), value.clone());
    }
    params
}
