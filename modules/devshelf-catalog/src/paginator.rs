// Page metadata for single-provider results.
//
// An upstream count is trusted when there is one. Without it we look ahead
// at `page + 1` with an otherwise identical request: one extra call, never a
// retry, and a failed look-ahead just means "no next page".

use devshelf_common::{page_count, PaginatedResult, Resource, ResourceQuery, Total};
use tracing::debug;

use crate::providers::{CatalogProvider, ProviderPage, UpstreamCount};

pub async fn paginate(
    provider: &dyn CatalogProvider,
    query: &ResourceQuery,
    page: ProviderPage,
) -> PaginatedResult {
    match page.count {
        UpstreamCount::Exact(n) => from_count(page.items, Total::Exact(n), page.has_more, query),
        UpstreamCount::Approximate(n) => {
            from_count(page.items, Total::Estimated(n), page.has_more, query)
        }
        UpstreamCount::Unknown => {
            let has_next = match page.has_more {
                Some(known) => known,
                None => peek_next(provider, query).await,
            };
            from_lookahead(page.items, has_next, query)
        }
    }
}

/// Does `page + 1` have at least one item? Errors count as "no".
pub async fn peek_next(provider: &dyn CatalogProvider, query: &ResourceQuery) -> bool {
    let next = query.at_page(query.page.saturating_add(1));
    match provider.fetch_page(&next).await {
        Ok(page) => !page.items.is_empty(),
        Err(e) => {
            debug!(
                provider = %provider.kind(),
                page = next.page,
                error = %e,
                "Look-ahead failed, assuming last page"
            );
            false
        }
    }
}

/// Metadata from an upstream count.
pub fn from_count(
    items: Vec<Resource>,
    total: Total,
    has_more: Option<bool>,
    query: &ResourceQuery,
) -> PaginatedResult {
    let total_pages = page_count(total.value(), query.page_size);
    let has_next = has_more.unwrap_or(query.page < total_pages);
    PaginatedResult::new(items, total, query.page, query.page_size, total_pages, has_next)
}

/// Metadata synthesized from the look-ahead outcome. Always an estimate: the "+1"
/// only says another page exists, not how big it is.
pub fn from_lookahead(
    items: Vec<Resource>,
    has_next: bool,
    query: &ResourceQuery,
) -> PaginatedResult {
    let on_page = items.len().min(query.page_size as usize) as u64;
    let before = query.offset() as u64;

    if has_next {
        PaginatedResult::new(
            items,
            Total::Estimated(before + on_page + 1),
            query.page,
            query.page_size,
            query.page.saturating_add(1),
            true,
        )
    } else {
        PaginatedResult::new(
            items,
            Total::Estimated(before + on_page),
            query.page,
            query.page_size,
            query.page,
            false,
        )
    }
}
