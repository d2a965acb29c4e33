//! `merger_percentage`: blends children in a fixed percentage ratio via a
//! round-robin blender (§4.6).

use serde_json::Value;

use crate::config::MergerPercentageConfig;
use crate::cursor::{Cursor, PageResult};
use crate::error::Result;
use crate::node::{evaluate, truncate_to_limit, EvalContext};

pub async fn evaluate(
    cfg: &MergerPercentageConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    let mut next_page = Cursor::empty();
    let mut has_next_page = false;
    let mut items_data: Vec<Vec<Value>> = Vec::with_capacity(cfg.items.len());

    for item in &cfg.items {
        let child_limit = (limit as u64 * item.percentage.max(0) as u64 / 100) as u32;
        let child_result = evaluate(&item.data, ctx, child_limit, cursor).await?;

        has_next_page |= child_result.has_next_page;
        next_page.merge(child_result.next_page);
        items_data.push(child_result.data);
    }

    let mut data = blend(items_data);
    if cfg.shuffle {
        ctx.shuffler.shuffle(&mut data);
    }
    truncate_to_limit(&mut data, limit);

    Ok(PageResult {
        data,
        next_page,
        has_next_page,
    })
}

/// The round-robin blender (§4.6 steps 1-3): take `size_i` items per pass
/// from each child list, `size_i = round(|data_i| / min_length)`, where
/// `min_length = max(1, min_i |data_i|)`.
pub(crate) fn blend(items_data: Vec<Vec<Value>>) -> Vec<Value> {
    let full_length: usize = items_data.iter().map(Vec::len).sum();
    if full_length == 0 {
        return Vec::new();
    }

    let min_length = items_data
        .iter()
        .map(Vec::len)
        .min()
        .filter(|&m| m > 0)
        .unwrap_or(1);

    struct Cursor2 {
        items: Vec<Value>,
        current: usize,
        size: usize,
    }

    let mut cursors: Vec<Cursor2> = items_data
        .into_iter()
        .map(|items| {
            let size = round_half_even(items.len() as f64 / min_length as f64).max(0) as usize;
            Cursor2 {
                items,
                current: 0,
                size,
            }
        })
        .collect();

    let mut result = Vec::with_capacity(full_length);
    while result.len() < full_length {
        let before = result.len();
        for cursor in &mut cursors {
            let start = cursor.current;
            let end = (start + cursor.size).min(cursor.items.len());
            result.extend(cursor.items[start..end].iter().cloned());
            cursor.current = end;
        }
        if result.len() == before {
            break;
        }
    }

    result
}

/// Round-half-to-even, matching Python's `round()` builtin.
pub(crate) fn round_half_even(x: f64) -> i64 {
    let floor = x.floor();
    let diff = x - floor;
    let f = floor as i64;
    if diff < 0.5 {
        f
    } else if diff > 0.5 {
        f + 1
    } else if f % 2 == 0 {
        f
    } else {
        f + 1
    }
}
