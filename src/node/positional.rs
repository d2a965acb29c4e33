//! `merger_positional`: splices fixed positions from one node into another
//! node's page (§4.5).
//!
//! The position arithmetic follows `original_source/smartfeed/schemas.py`
//! exactly, including its one-based `page_positions` values (derived from
//! `available_positions.index(position)`, which — because the window is
//! `[(page-1)*limit, page*limit]` inclusive of both ends — actually yields
//! `position - (page-1)*limit`) and its habit of splicing sequentially into
//! the *growing* result list rather than pre-computing final indices.

use crate::config::MergerPositionalConfig;
use crate::cursor::{Cursor, NodeCursor, PageResult};
use crate::error::Result;
use crate::node::{evaluate, truncate_to_limit, EvalContext};

pub async fn evaluate(
    cfg: &MergerPositionalConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    let input_cursor = cursor.get(&cfg.merger_id);
    let page = input_cursor.page as i64;
    let limit_i = limit as i64;

    let default_res = evaluate(&cfg.default, ctx, limit, cursor).await?;

    let window_start = (page - 1) * limit_i;
    let window_end = page * limit_i;

    // `page_positions` holds one-based offsets within the page (see module
    // docs for why these are one-based, not zero-based).
    let mut page_positions: Vec<i64> = Vec::new();
    for &position in &cfg.positions {
        if position >= window_start && position <= window_end {
            page_positions.push(position - window_start);
        }
    }

    let mut positional_has_next_page = true;
    let max_configured_position = cfg.positions.iter().copied().max().unwrap_or(0);
    if window_end >= max_configured_position {
        positional_has_next_page = false;
    }

    if let (Some(start), Some(end), Some(step)) = (cfg.start, cfg.end, cfg.step) {
        positional_has_next_page = window_end < end;
        let mut position = start;
        while position < end {
            if position >= window_start && position <= window_end {
                page_positions.push(position - window_start);
            }
            position += step;
        }
    }

    let pos_res = evaluate(&cfg.positional, ctx, page_positions.len() as u32, cursor).await?;

    let mut data = default_res.data;
    for (i, item) in pos_res.data.into_iter().enumerate() {
        let idx = page_positions[i] - 1;
        let eff_idx = if idx >= 0 {
            (idx as usize).min(data.len())
        } else {
            data.len().saturating_sub((-idx) as usize)
        };
        data.insert(eff_idx, item);
    }
    truncate_to_limit(&mut data, limit);

    let mut has_next_page = default_res.has_next_page;
    if !has_next_page && positional_has_next_page && pos_res.has_next_page {
        has_next_page = true;
    }

    let mut next_page = Cursor::empty();
    next_page.merge(default_res.next_page);
    next_page.merge(pos_res.next_page);
    next_page.insert(
        cfg.merger_id.clone(),
        NodeCursor {
            page: input_cursor.page + 1,
            after: input_cursor.after,
        },
    );

    Ok(PageResult {
        data,
        next_page,
        has_next_page,
    })
}
