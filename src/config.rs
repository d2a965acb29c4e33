//! Config tree parsing and validation.
//!
//! The wire format is a JSON object `{"version": ..., "feed": <node>}`
//! where `<node>` is a `type`-discriminated union (§3, §6). Parsing is a
//! two-step process mirroring the teacher's `Config::load` /
//! `register_schema`: `serde_json` does the structural deserialization
//! (rejecting unknown/missing fields), then `FeedConfig::parse` walks the
//! resulting tree to check the cross-field invariants `serde` cannot
//! express (unique ids, positional bounds, gradient ranges).

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FeedError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubFeedConfig {
    pub subfeed_id: String,
    pub method_name: String,
    #[serde(default)]
    pub subfeed_params: serde_json::Map<String, Value>,
    #[serde(default = "default_true")]
    pub raise_error: bool,
    #[serde(default)]
    pub shuffle: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerAppendConfig {
    pub merger_id: String,
    pub items: Vec<FeedNode>,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerAppendDistributeConfig {
    pub merger_id: String,
    pub items: Vec<FeedNode>,
    pub distribution_key: String,
    #[serde(default)]
    pub sorting_key: Option<String>,
    #[serde(default)]
    pub sorting_desc: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerPositionalConfig {
    pub merger_id: String,
    #[serde(default)]
    pub positions: Vec<i64>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub step: Option<i64>,
    pub positional: Box<FeedNode>,
    pub default: Box<FeedNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PercentageItemConfig {
    pub percentage: i64,
    pub data: FeedNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerPercentageConfig {
    pub merger_id: String,
    pub items: Vec<PercentageItemConfig>,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerPercentageGradientConfig {
    pub merger_id: String,
    pub item_from: PercentageItemConfig,
    pub item_to: PercentageItemConfig,
    pub step: i64,
    pub size_to_step: i64,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergerViewSessionConfig {
    pub merger_id: String,
    pub session_size: u32,
    pub session_live_time: u64,
    pub data: Box<FeedNode>,
    #[serde(default)]
    pub deduplicate: bool,
    #[serde(default)]
    pub dedup_key: Option<String>,
    #[serde(default)]
    pub shuffle: bool,
}

/// Discriminated union of every node type the config tree can contain.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum FeedNode {
    #[serde(rename = "subfeed")]
    SubFeed(SubFeedConfig),
    #[serde(rename = "merger_append")]
    Append(MergerAppendConfig),
    #[serde(rename = "merger_distribute")]
    AppendDistribute(MergerAppendDistributeConfig),
    #[serde(rename = "merger_positional")]
    Positional(MergerPositionalConfig),
    #[serde(rename = "merger_percentage")]
    Percentage(MergerPercentageConfig),
    #[serde(rename = "merger_percentage_gradient")]
    PercentageGradient(MergerPercentageGradientConfig),
    #[serde(rename = "merger_view_session")]
    ViewSession(MergerViewSessionConfig),
}

impl FeedNode {
    /// This node's own id (`merger_id` or `subfeed_id`).
    pub fn node_id(&self) -> &str {
        match self {
            FeedNode::SubFeed(c) => &c.subfeed_id,
            FeedNode::Append(c) => &c.merger_id,
            FeedNode::AppendDistribute(c) => &c.merger_id,
            FeedNode::Positional(c) => &c.merger_id,
            FeedNode::Percentage(c) => &c.merger_id,
            FeedNode::PercentageGradient(c) => &c.merger_id,
            FeedNode::ViewSession(c) => &c.merger_id,
        }
    }

    fn children(&self) -> Vec<&FeedNode> {
        match self {
            FeedNode::SubFeed(_) => vec![],
            FeedNode::Append(c) => c.items.iter().collect(),
            FeedNode::AppendDistribute(c) => c.items.iter().collect(),
            FeedNode::Positional(c) => vec![c.positional.as_ref(), c.default.as_ref()],
            FeedNode::Percentage(c) => c.items.iter().map(|i| &i.data).collect(),
            FeedNode::PercentageGradient(c) => vec![&c.item_from.data, &c.item_to.data],
            FeedNode::ViewSession(c) => vec![c.data.as_ref()],
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FeedNode::Positional(c) => {
                let has_positions = !c.positions.is_empty();
                let has_range = c.start.is_some() && c.end.is_some() && c.step.is_some();
                if !has_positions && !has_range {
                    return Err(FeedError::ConfigInvalid(format!(
                        "merger_positional {:?}: either `positions` or all of `start`, `end`, `step` must be provided",
                        c.merger_id
                    )));
                }
                if let (Some(start), Some(end)) = (c.start, c.end) {
                    if has_positions {
                        let max_position = c.positions.iter().copied().max().unwrap();
                        if start <= max_position {
                            return Err(FeedError::ConfigInvalid(format!(
                                "merger_positional {:?}: `start` ({start}) must be greater than the maximum of `positions` ({max_position})",
                                c.merger_id
                            )));
                        }
                    }
                    if end <= start {
                        return Err(FeedError::ConfigInvalid(format!(
                            "merger_positional {:?}: `end` ({end}) must be greater than `start` ({start})",
                            c.merger_id
                        )));
                    }
                }
            }
            FeedNode::PercentageGradient(c) => {
                if !(1..=100).contains(&c.step) {
                    return Err(FeedError::ConfigInvalid(format!(
                        "merger_percentage_gradient {:?}: `step` must be in range [1, 100], got {}",
                        c.merger_id, c.step
                    )));
                }
                if c.size_to_step < 1 {
                    return Err(FeedError::ConfigInvalid(format!(
                        "merger_percentage_gradient {:?}: `size_to_step` must be >= 1, got {}",
                        c.merger_id, c.size_to_step
                    )));
                }
            }
            _ => {}
        }
        for child in self.children() {
            child.validate()?;
        }
        Ok(())
    }

    fn collect_ids<'a>(&'a self, ids: &mut HashSet<&'a str>) -> Result<()> {
        let id = self.node_id();
        if !ids.insert(id) {
            return Err(FeedError::ConfigInvalid(format!(
                "duplicate node id {id:?}: every merger_id/subfeed_id must be unique across the tree"
            )));
        }
        for child in self.children() {
            child.collect_ids(ids)?;
        }
        Ok(())
    }
}

/// The parsed, immutable config tree. Parsed once per `FeedManager` and
/// never mutated thereafter (§3 Lifecycles).
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub version: String,
    pub feed: FeedNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFeedConfig {
    version: String,
    feed: FeedNode,
}

impl FeedConfig {
    /// Parse and validate a config tree from JSON.
    pub fn parse(value: Value) -> Result<FeedConfig> {
        let raw: RawFeedConfig = serde_json::from_value(value)
            .map_err(|e| FeedError::ConfigInvalid(e.to_string()))?;

        let mut ids = HashSet::new();
        raw.feed.collect_ids(&mut ids)?;
        raw.feed.validate()?;

        Ok(FeedConfig {
            version: raw.version,
            feed: raw.feed,
        })
    }

    pub fn parse_str(text: &str) -> Result<FeedConfig> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| FeedError::ConfigInvalid(e.to_string()))?;
        Self::parse(value)
    }
}
