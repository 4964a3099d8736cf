//! Sequential page walk
//!
//! Each page's URL depends on the previous page number, so pages are fetched
//! one at a time, starting at page 1, and never overlap.

use crate::error::{Error, Result};
use crate::records::Page;
use std::future::Future;
use tracing::debug;

/// Fetch pages 1, 2, 3, ... until one reports no next page
///
/// Records are returned in page order and, within a page, in server order.
/// The walk is all-or-nothing: the first failed fetch aborts it and the
/// records gathered so far are dropped. If page `max_pages` still reports a
/// next page the walk fails with [`Error::PaginationExhausted`] instead of
/// looping forever.
pub async fn collect_pages<P, F, Fut>(max_pages: u32, mut fetch_page: F) -> Result<Vec<P::Record>>
where
    P: Page,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let mut records = Vec::new();

    for page_number in 1..=max_pages {
        let page = fetch_page(page_number).await?;
        let has_next = page.has_next();
        let page_records = page.into_records();
        debug!(
            page = page_number,
            records = page_records.len(),
            has_next,
            "Fetched page"
        );
        records.extend(page_records);

        if !has_next {
            return Ok(records);
        }
    }

    Err(Error::PaginationExhausted { max_pages })
}
