//! `merger_distribute`: append-then-distribute so no two adjacent items
//! share a `distribution_key` (§4.4).

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::config::MergerAppendDistributeConfig;
use crate::cursor::{Cursor, PageResult};
use crate::error::Result;
use crate::items::{key_or_self, value_key};
use crate::node::{evaluate, truncate_to_limit, EvalContext};

pub async fn evaluate(
    cfg: &MergerAppendDistributeConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    // Assemble exactly like `merger_append`: sequential children, shrinking
    // limit, cursor merge, OR'd has_next_page.
    let mut data = Vec::new();
    let mut next_page = Cursor::empty();
    let mut has_next_page = false;
    let mut remaining = limit;

    for child in &cfg.items {
        let child_result = evaluate(child, ctx, remaining, cursor).await?;

        remaining = remaining.saturating_sub(child_result.data.len() as u32);
        data.extend(child_result.data);
        has_next_page |= child_result.has_next_page;
        next_page.merge(child_result.next_page);

        if remaining == 0 {
            break;
        }
    }

    if let Some(sorting_key) = &cfg.sorting_key {
        sort_by_key(&mut data, sorting_key, cfg.sorting_desc);
    }

    let mut data = distribute(data, &cfg.distribution_key);
    truncate_to_limit(&mut data, limit);

    Ok(PageResult {
        data,
        next_page,
        has_next_page,
    })
}

fn sort_by_key(data: &mut [Value], sorting_key: &str, desc: bool) {
    data.sort_by(|a, b| {
        let ordering = compare_values(key_or_self(a, sorting_key), key_or_self(b, sorting_key));
        if desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => match (a.as_str(), b.as_str()) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => value_key(a).cmp(&value_key(b)),
        },
    }
}

/// Round-robin drain of `data` bucketed by `distribution_key`, skipping a
/// bucket for one pass whenever it would emit the same key as the item
/// just emitted and more than one bucket remains (§4.4 algorithm).
fn distribute(data: Vec<Value>, distribution_key: &str) -> Vec<Value> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, VecDeque<Value>> = HashMap::new();

    for item in data {
        let key = value_key(key_or_self(&item, distribution_key));
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push_back(item);
    }

    let mut result = Vec::new();
    let mut prev_key: Option<String> = None;

    while order
        .iter()
        .any(|k| buckets.get(k).is_some_and(|q| !q.is_empty()))
    {
        let snapshot = order.clone();
        for key in &snapshot {
            let bucket_len = buckets.get(key).map_or(0, VecDeque::len);
            if bucket_len == 0 {
                continue;
            }

            let non_empty_count = order
                .iter()
                .filter(|k| buckets.get(*k).is_some_and(|q| !q.is_empty()))
                .count();

            if prev_key.as_deref() != Some(key.as_str()) || non_empty_count == 1 {
                let item = buckets.get_mut(key).unwrap().pop_front().unwrap();
                result.push(item);
                prev_key = Some(key.clone());
            }

            if buckets.get(key).is_some_and(VecDeque::is_empty) {
                order.retain(|k| k != key);
            }
        }
    }

    result
}
