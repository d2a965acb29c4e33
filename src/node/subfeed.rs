//! Leaf node: wraps a single host-provided fetcher (§4.2).

use crate::config::SubFeedConfig;
use crate::cursor::{ClientPage, Cursor, PageResult};
use crate::error::{FeedError, Result};
use crate::fetcher::project_params;
use crate::node::{truncate_to_limit, EvalContext};

pub async fn evaluate(
    cfg: &SubFeedConfig,
    ctx: &EvalContext<'_>,
    limit: u32,
    cursor: &Cursor,
) -> Result<PageResult> {
    let sub_cursor = cursor.get(&cfg.subfeed_id);

    let fetcher = ctx
        .fetchers
        .get(&cfg.method_name)
        .ok_or_else(|| FeedError::FetcherMissing(cfg.method_name.clone()))?;

    let params = project_params(ctx.extra, fetcher.declared_params(), &cfg.subfeed_params);

    let client_page = match fetcher
        .fetch(ctx.user_id, limit, &sub_cursor, &params)
        .await
    {
        Ok(page) => page,
        Err(err) => {
            if cfg.raise_error {
                return Err(FeedError::FetcherRaised(cfg.method_name.clone(), err));
            }
            tracing::warn!(
                subfeed_id = %cfg.subfeed_id,
                method_name = %cfg.method_name,
                error = %err,
                "fetcher raised; substituting empty page (raise_error = false)"
            );
            ClientPage::empty(sub_cursor)
        }
    };

    let ClientPage {
        mut data,
        next_page,
        has_next_page,
    } = client_page;

    if cfg.shuffle {
        ctx.shuffler.shuffle(&mut data);
    }
    truncate_to_limit(&mut data, limit);

    let mut next_cursor = Cursor::empty();
    next_cursor.insert(cfg.subfeed_id.clone(), next_page);

    Ok(PageResult {
        data,
        next_page: next_cursor,
        has_next_page,
    })
}
