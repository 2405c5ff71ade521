//! Cursor-driven pagination drain

use std::future::Future;

use tracing::debug;

use crate::error::VaultError;
use crate::provider::Page;

/// Fetch pages until the cursor runs out or `limit` items are collected.
///
/// `fetch` receives the current cursor and the remaining-limit hint. The
/// result is not truncated: a service that ignores the hint can push the
/// total past `limit` by up to one page.
pub async fn drain_pages<T, F, Fut>(limit: Option<u32>, mut fetch: F) -> Result<Vec<T>, VaultError>
where
    F: FnMut(Option<String>, Option<u32>) -> Fut,
    Fut: Future<Output = Result<Page<T>, VaultError>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0_u32;

    loop {
        let collected = u32::try_from(items.len()).unwrap_or(u32::MAX);
        if limit.is_some_and(|limit| collected >= limit) {
            break;
        }
        let remaining = limit.map(|limit| limit - collected);

        let page = fetch(cursor.take(), remaining).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_page {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(pages, items = items.len(), "Drained paginated listing");
    Ok(items)
}
