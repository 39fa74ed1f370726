//! Collection walker
//!
//! Follows `next` cursors page by page and accumulates summary records.

use super::cursor::parse_cursor;
use super::types::{Page, PageQuery, StopReason, Walk, WalkConfig};
use crate::error::Result;
use crate::resource::ResourceApi;
use tracing::{debug, warn};

/// Walks a paginated listing to the end.
///
/// Holds no state between walks; calling it twice performs two full walks.
pub struct CollectionWalker<'a> {
    api: &'a dyn ResourceApi,
    config: WalkConfig,
}

impl<'a> CollectionWalker<'a> {
    /// Create a walker with default limits
    pub fn new(api: &'a dyn ResourceApi) -> Self {
        Self {
            api,
            config: WalkConfig::default(),
        }
    }

    /// Set walk limits
    #[must_use]
    pub fn with_config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    /// Query for the first page of a full walk
    pub fn first_query(&self) -> PageQuery {
        PageQuery::first(self.config.page_size)
    }

    /// Fetch the first page and walk the rest.
    ///
    /// Only a failure on the first page is returned as an error.
    pub async fn fetch_all(&self, query: PageQuery) -> Result<Walk> {
        let first = self.api.fetch_page(&query).await?;
        Ok(self.walk(query, first).await)
    }

    /// Walk the collection starting from an already fetched first page
    pub async fn walk(&self, query: PageQuery, first: Page) -> Walk {
        let kind = &self.api.kind().name;
        let mut records = Vec::new();
        let mut pages = 1usize;
        let mut current = query.page.unwrap_or(0);
        let mut query = query;
        let mut page = first;

        let stop = loop {
            if page.items.is_empty() {
                break StopReason::EmptyPage;
            }

            debug!(kind = %kind, page = current, items = page.items.len(), "Collected listing page");
            records.append(&mut page.items);

            let Some(link) = page.next_link() else {
                break StopReason::Exhausted;
            };

            let cursor = match parse_cursor(&link.href) {
                Ok(cursor) => cursor,
                Err(e) => {
                    warn!(kind = %kind, error = %e, "Stopping walk on malformed cursor");
                    break StopReason::MalformedCursor;
                }
            };

            if cursor.page <= current {
                warn!(
                    kind = %kind,
                    current,
                    next = cursor.page,
                    "Stopping walk, next page does not advance"
                );
                break StopReason::CursorStalled;
            }

            if pages >= self.config.max_pages {
                warn!(kind = %kind, pages, "Stopping walk at page limit");
                break StopReason::PageLimit;
            }

            query = query.advance(cursor);
            current = cursor.page;

            page = match self.api.fetch_page(&query).await {
                Ok(next) => next,
                Err(e) => {
                    warn!(kind = %kind, page = current, error = %e, "Stopping walk on page fetch failure");
                    break StopReason::FetchFailed;
                }
            };
            pages += 1;
        };

        debug!(
            kind = %kind,
            records = records.len(),
            pages,
            stop = ?stop,
            "Finished collection walk"
        );

        Walk {
            records,
            pages,
            stop,
        }
    }
}
