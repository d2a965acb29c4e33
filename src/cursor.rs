//! Pagination cursor and page-result types.
//!
//! The cursor is the sole continuation state threaded between calls: a flat
//! map from node id to that node's own `(page, after)` pair. No in-process
//! state survives across calls — everything the engine needs to resume a
//! page lives in the cursor the caller round-trips back to it.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FeedError, Result};

/// Per-node pagination state.
///
/// `page` is a 1-based ordinal; `after` is an opaque sentinel only the leaf
/// fetcher that produced it understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCursor {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub after: Option<Value>,
}

fn default_page() -> u32 {
    1
}

impl Default for NodeCursor {
    fn default() -> Self {
        Self {
            page: 1,
            after: None,
        }
    }
}

/// Flat `node_id -> NodeCursor` map. An absent entry means "page 1, no
/// after" for that node; this lets the engine accept partial cursors and
/// silently ignore stale entries left over from a prior config shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub data: HashMap<String, NodeCursor>,
}

impl Cursor {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The `NodeCursor` for `node_id`, or the page-1 default if absent.
    pub fn get(&self, node_id: &str) -> NodeCursor {
        self.data.get(node_id).cloned().unwrap_or_default()
    }

    pub fn insert(&mut self, node_id: impl Into<String>, cursor: NodeCursor) {
        self.data.insert(node_id.into(), cursor);
    }

    /// Merge another cursor's entries into this one, the other's entries
    /// winning on key conflict (matches the reference implementation's
    /// `next_page.data.update(child.next_page.data)`).
    pub fn merge(&mut self, other: Cursor) {
        self.data.extend(other.data);
    }

    /// Decode a cursor from the HTTP boundary: accepts either a raw JSON
    /// object string or a URL-safe base64 encoding of that JSON string,
    /// trying base64 first and falling back to direct JSON.
    pub fn decode(raw: &str) -> Result<Cursor> {
        if let Ok(decoded) = URL_SAFE_NO_PAD.decode(raw) {
            if let Ok(text) = String::from_utf8(decoded) {
                if let Ok(cursor) = serde_json::from_str::<Cursor>(&text) {
                    return Ok(cursor);
                }
            }
        }
        serde_json::from_str::<Cursor>(raw)
            .map_err(|e| FeedError::CursorDecode(format!("invalid cursor: {e}")))
    }
}

/// One page produced by a node's `get_data`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResult {
    pub data: Vec<Value>,
    pub next_page: Cursor,
    pub has_next_page: bool,
}

/// The page a host-provided leaf fetcher hands back to a `SubFeed` node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPage {
    pub data: Vec<Value>,
    pub next_page: NodeCursor,
    pub has_next_page: bool,
}

impl ClientPage {
    pub fn empty(next_page: NodeCursor) -> Self {
        Self {
            data: Vec::new(),
            next_page,
            has_next_page: false,
        }
    }
}
