//! `merger_percentage_gradient`: blends two children whose mix shifts by a
//! fixed step every `size_to_step` output positions (§4.7).

use crate::config::MergerPercentageGradientConfig;
use crate::cursor::{Cursor, NodeCursor, PageResult};
use crate::error::Result;
use crate::node::{evaluate, truncate_to_limit, EvalContext};

struct PercentBucket {
    limit: i64,
    from: i64,
    to: i64,
}

struct LimitsAndPercents {
    limit_from: i64,
    limit_to: i64,
    buckets: Vec<PercentBucket>,
}

/// `_calculate_limits_and_percents` from the reference implementation,
/// carried over arithmetic-for-arithmetic.
fn calculate_limits_and_percents(
    page: i64,
    limit: i64,
    mut percentage_from: i64,
    mut percentage_to: i64,
    step: i64,
    size_to_step: i64,
) -> LimitsAndPercents {
    let mut limit_from = 0i64;
    let mut limit_to = 0i64;
    let mut buckets: Vec<PercentBucket> = Vec::new();

    let mut start_position = limit * (page - 1);
    let mut first_iter = true;
    let mut i = size_to_step;
    let upper = limit * page + size_to_step;

    while i < upper {
        if !first_iter && percentage_to < 100 {
            percentage_from -= step;
            percentage_to += step;
            if percentage_to > 100 || percentage_from < 0 {
                percentage_from = 0;
                percentage_to = 100;
            }
        }

        if i > start_position {
            let iter_limit = if i > limit * page {
                limit * page - start_position
            } else {
                i - start_position
            };
            start_position = i;

            if let Some(last) = buckets.last_mut() {
                if last.to >= 100 {
                    limit_to += iter_limit;
                    last.limit += iter_limit;
                    i += size_to_step;
                    first_iter = false;
                    continue;
                }
            }
            limit_from += iter_limit * percentage_from / 100;
            limit_to += iter_limit * percentage_to / 100;
            buckets.push(PercentBucket {
                limit: iter_limit,
                from: percentage_from,
                to: percentage_to,
            });
        }

        first_iter = false;
        i += size_to_step;
    }

    LimitsAndPercents {
        limit_from,
        limit_to,
        buckets,
    }
}

pub async fn evaluate(
    cfg: &MergerPercentageGradientConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    let input_cursor = cursor.get(&cfg.merger_id);

    let limits_and_percents = calculate_limits_and_percents(
        input_cursor.page as i64,
        limit as i64,
        cfg.item_from.percentage,
        cfg.item_to.percentage,
        cfg.step,
        cfg.size_to_step,
    );

    let item_from = evaluate(
        &cfg.item_from.data,
        ctx,
        limits_and_percents.limit_from.max(0) as u32,
        cursor,
    )
    .await?;
    let item_to = evaluate(
        &cfg.item_to.data,
        ctx,
        limits_and_percents.limit_to.max(0) as u32,
        cursor,
    )
    .await?;

    let mut data = Vec::new();
    let mut from_start = 0usize;
    let mut to_start = 0usize;
    for bucket in &limits_and_percents.buckets {
        let from_end = ((bucket.limit * bucket.from / 100) as usize + from_start).min(item_from.data.len());
        let to_end = ((bucket.limit * bucket.to / 100) as usize + to_start).min(item_to.data.len());

        data.extend(item_from.data[from_start..from_end].iter().cloned());
        data.extend(item_to.data[to_start..to_end].iter().cloned());

        from_start = from_end;
        to_start = to_end;
    }

    if cfg.shuffle {
        ctx.shuffler.shuffle(&mut data);
    }
    truncate_to_limit(&mut data, limit);

    let has_next_page = item_from.has_next_page || item_to.has_next_page;

    let mut next_page = Cursor::empty();
    next_page.merge(item_from.next_page);
    next_page.merge(item_to.next_page);
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
