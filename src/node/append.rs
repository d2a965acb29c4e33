//! `merger_append`: sequential concatenation with a shrinking limit (§4.3).

use crate::config::MergerAppendConfig;
use crate::cursor::{Cursor, PageResult};
use crate::error::Result;
use crate::node::{evaluate, truncate_to_limit, EvalContext};

pub async fn evaluate(
    cfg: &MergerAppendConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
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
