//! Stitching every page of the domain listing into one collection.
//!
//! # Design
//! The listing endpoint returns at most `MAX_PAGE_SIZE` rows. Page 1 is
//! always fetched first because it is the only way to learn `TotalItems`;
//! the remaining pages are then fetched in order, one at a time. The page
//! count is fixed from that first response, so rows added or removed on the
//! server mid-walk are neither detected nor corrected.

use thiserror::Error;

use crate::error::ApiError;
use crate::query::MAX_PAGE_SIZE;
use crate::types::{DomainListEntry, DomainPage};

/// The records gathered before a page request failed, plus that failure.
#[derive(Debug, Error)]
#[error("listing stopped after {} records: {error}", .items.len())]
pub struct PartialResult {
    pub items: Vec<DomainListEntry>,
    #[source]
    pub error: ApiError,
}

/// Pages needed after page 1 to cover `total_items` at `MAX_PAGE_SIZE` rows
/// per page.
pub fn additional_pages(total_items: u32) -> u32 {
    if total_items <= MAX_PAGE_SIZE {
        return 0;
    }
    let remaining = total_items - MAX_PAGE_SIZE;
    let full = remaining / MAX_PAGE_SIZE;
    if remaining % MAX_PAGE_SIZE == 0 {
        full
    } else {
        full + 1
    }
}

/// Walk the listing with `fetch_page(page_number)`, which must request that
/// page at `MAX_PAGE_SIZE`.
///
/// On the first failure the walk stops and everything collected so far is
/// returned alongside the error.
pub fn collect_all_pages<F>(mut fetch_page: F) -> Result<Vec<DomainListEntry>, PartialResult>
where
    F: FnMut(u32) -> Result<DomainPage, ApiError>,
{
    let first = match fetch_page(1) {
        Ok(page) => page,
        Err(error) => {
            return Err(PartialResult {
                items: Vec::new(),
                error,
            })
        }
    };

    let total = first.paging.total_items;
    let last_page = 1 + additional_pages(total);
    log::debug!("[namecheap] listing has {total} domains across {last_page} page(s)");

    // `TotalItems` is server-reported; grow page by page.
    let mut items = first.domains;

    for page in 2..=last_page {
        match fetch_page(page) {
            Ok(next) => {
                log::debug!(
                    "[namecheap] page {page}/{last_page}: {} domains",
                    next.domains.len()
                );
                items.extend(next.domains);
            }
            Err(error) => {
                log::debug!(
                    "[namecheap] page {page}/{last_page} failed after {} domains",
                    items.len()
                );
                return Err(PartialResult { items, error });
            }
        }
    }

    Ok(items)
}
