use crate::api::ApiResult;
use crate::models::Paged;
use leptos::logging::warn;
use std::future::Future;

/// Upper bound on a single page requested from a listing endpoint. The client
/// never asks the server for an unbounded page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Safety valve for a server whose `hasNext` never flips to false. A crawl
/// that hits this bound stops and keeps what it has instead of hanging.
pub const MAX_AGGREGATED_PAGES: u32 = 50;

/// A fully crawled collection. `truncated` is set when the page cap stopped
/// the crawl early; `items` still holds everything fetched up to that point.
#[derive(Clone, Debug, Default)]
pub struct Crawl<T> {
    pub items: Vec<T>,
    pub truncated: bool,
}

/// Drives `fetch` from page 1 upward and concatenates the results, in page
/// order then intra-page order, while the server reports another page.
///
/// Callers must not assume a complete collection when `truncated` is set.
/// No de-duplication is performed: a collection mutated while the crawl runs
/// is returned as observed, gaps and repeats included.
pub async fn collect_all_pages<T, F, Fut>(mut fetch: F) -> ApiResult<Crawl<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<Paged<T>>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut page = 1;

    loop {
        let result = fetch(page).await?;
        items.extend(result.data);

        if !result.pagination.has_next {
            return Ok(Crawl {
                items,
                truncated: false,
            });
        }

        if page >= MAX_AGGREGATED_PAGES {
            warn!(
                "page crawl stopped at the {MAX_AGGREGATED_PAGES}-page cap with {} items; the server still reports more",
                items.len()
            );
            return Ok(Crawl {
                items,
                truncated: true,
            });
        }

        page += 1;
    }
}
