use tracing::{info, warn};

use crate::error::AnnotationError;
use crate::search::{SearchClient, SearchResponse};

/// Offset bookkeeping for a `start`/`rows` paged search.
///
/// `total` is taken from the first response and never refreshed, so documents
/// added or removed during a run are not reflected in the stopping condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    offset: u64,
    page_size: u64,
    total: u64,
}

impl PageCursor {
    pub fn new(page_size: u64, total: u64) -> Result<Self, AnnotationError> {
        if page_size == 0 {
            return Err(AnnotationError::InvalidPageSize(page_size));
        }
        Ok(Self {
            offset: 0,
            page_size,
            total,
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.total
    }

    /// Returns the offset of the next page to request and advances past it.
    pub fn next_offset(&mut self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }
        let current = self.offset;
        self.offset = self.offset.saturating_add(self.page_size);
        Some(current)
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub start: u64,
    pub response: SearchResponse,
}

#[derive(Debug)]
pub enum PageOutcome {
    Fetched(Page),
    Skipped { start: u64, error: AnnotationError },
}

/// Lazily walks every page of a search, one request at a time.
pub struct Paginator<'a, C: SearchClient> {
    client: &'a C,
    cursor: PageCursor,
    first: Option<SearchResponse>,
}

impl<'a, C: SearchClient> Paginator<'a, C> {
    /// Issues the request for offset 0. Any failure here is fatal: without it
    /// there is no total to page against.
    pub fn start(client: &'a C, page_size: u64) -> Result<Self, AnnotationError> {
        if page_size == 0 {
            return Err(AnnotationError::InvalidPageSize(page_size));
        }
        let first = client.fetch_page(0, page_size)?;
        let cursor = PageCursor::new(page_size, first.total())?;
        info!(total = cursor.total(), page_size, "search total resolved");
        Ok(Self {
            client,
            cursor,
            first: Some(first),
        })
    }

    pub fn total(&self) -> u64 {
        self.cursor.total()
    }

    pub fn page_size(&self) -> u64 {
        self.cursor.page_size()
    }
}

impl<C: SearchClient> Iterator for Paginator<'_, C> {
    type Item = PageOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.cursor.next_offset()?;
        if start == 0 {
            if let Some(response) = self.first.take() {
                return Some(PageOutcome::Fetched(Page { start, response }));
            }
        }
        match self.client.fetch_page(start, self.cursor.page_size()) {
            Ok(response) => Some(PageOutcome::Fetched(Page { start, response })),
            Err(error) => {
                warn!(start, %error, "skipping page");
                Some(PageOutcome::Skipped { start, error })
            }
        }
    }
}
