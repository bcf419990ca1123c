use crate::error::Result;
use crate::models::{PageCursor, StoredListing};
use crate::platform::{ListingFilter, ListingStore};
use tracing::debug;

/// Fixed page size, shared by the category and owner views
pub const PAGE_SIZE: usize = 10;

/// Accumulating, cursor-paginated view over one slice of the listings
/// collection. "Load more" is simply another `fetch_page` call; pages
/// are ordered by creation time descending and stay disjoint.
#[derive(Debug)]
pub struct CategoryFeed {
    filter: ListingFilter,
    page_size: usize,
    items: Vec<StoredListing>,
    cursor: Option<PageCursor>,
    exhausted: bool,
}

impl CategoryFeed {
    pub fn new(filter: ListingFilter) -> Self {
        Self::with_page_size(filter, PAGE_SIZE)
    }

    pub fn with_page_size(filter: ListingFilter, page_size: usize) -> Self {
        Self {
            filter,
            page_size,
            items: Vec::new(),
            cursor: None,
            exhausted: false,
        }
    }

    /// Everything fetched so far, in descending creation order
    pub fn items(&self) -> &[StoredListing] {
        &self.items
    }

    /// False once a short or empty page has marked the end of the data,
    /// so no superfluous "load more" is offered.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Fetch the next page and append it. On error the feed is left
    /// unchanged, so the caller can surface a notification and retry.
    /// Returns the number of records appended.
    pub async fn fetch_page(&mut self, store: &dyn ListingStore) -> Result<usize> {
        if self.exhausted {
            return Ok(0);
        }

        let page = store
            .query_page(&self.filter, self.page_size, self.cursor.as_ref())
            .await?;

        let fetched = page.len();
        if fetched < self.page_size {
            // A short page (including an empty one) is the end of the data.
            self.cursor = None;
            self.exhausted = true;
        } else {
            self.cursor = page.last().map(PageCursor::after);
        }

        debug!(fetched, exhausted = self.exhausted, "appended listings page");
        self.items.extend(page);
        Ok(fetched)
    }

    /// Drop a record from the accumulated view, after a remote delete
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|listing| listing.id != id);
    }
}
