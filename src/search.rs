use tracing::info;

use crate::api::{Query, RawItem, SearchApi};
use crate::config::PAGE_SIZE;
use crate::error::{AppError, Result};

/// Fetches every result page for `query` and returns the items in fetch order.
///
/// The first request goes out as the query stands (page 1). Pages 2..=totalPages are then
/// requested one at a time with `PAGE_SIZE` entries per page, which leaves `query`
/// pointing at the last page fetched. Any failed fetch ends the run: a failed first page
/// is `SearchFailed`, a later one `PageFailed`, and no partial result is returned.
pub async fn collect_all(api: &dyn SearchApi, query: &mut Query) -> Result<Vec<RawItem>> {
    let first = api.fetch(query).await.map_err(AppError::SearchFailed)?;

    let total_pages = first.total_pages;
    let mut items = first.items;
    info!("Fetched page 1 of {}: {} items", total_pages.max(1), items.len());

    for page in 2..=total_pages {
        query.set_page(PAGE_SIZE, page);

        let next = api
            .fetch(query)
            .await
            .map_err(|source| AppError::PageFailed { page, source })?;

        info!("Fetched page {} of {}: {} items", page, total_pages, next.items.len());
        items.extend(next.items);
    }

    Ok(items)
}
