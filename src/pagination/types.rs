//! Pagination types
//!
//! Pages, links, cursors and the result of a walk.

use crate::resource::SummaryRecord;
use serde::{Deserialize, Serialize};

/// Relational link attached to a listing page or record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Relation (`next`, `previous`, `self`)
    #[serde(default)]
    pub rel: String,
    /// Target URL
    pub href: String,
    /// Media type hint
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl PageLink {
    /// Create a link with the given relation
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            media_type: None,
        }
    }

    /// Create a `next` link
    pub fn next(href: impl Into<String>) -> Self {
        Self::new("next", href)
    }

    /// Check if this is the `next` relation
    pub fn is_next(&self) -> bool {
        self.rel.eq_ignore_ascii_case("next")
    }
}

/// One page of a collection listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Summary records in API order
    pub items: Vec<SummaryRecord>,
    /// Relational links of the page
    pub links: Vec<PageLink>,
    /// Total number of resources, when reported
    pub total: Option<u64>,
}

impl Page {
    /// Create a page without links
    pub fn new(items: Vec<SummaryRecord>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Add a `next` link
    #[must_use]
    pub fn with_next(mut self, href: impl Into<String>) -> Self {
        self.links.push(PageLink::next(href));
        self
    }

    /// Set the reported total
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// The `next` relation, if present
    pub fn next_link(&self) -> Option<&PageLink> {
        self.links.iter().find(|link| link.is_next())
    }
}

/// Position of a page, parsed from a `next` link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Page number
    pub page: u32,
    /// Page size, if the link carries one
    pub size: Option<u32>,
}

/// Query for one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Page number (API default when absent)
    pub page: Option<u32>,
    /// Page size (API default when absent)
    pub size: Option<u32>,
    /// Extra filter parameters
    pub filters: Vec<(String, String)>,
}

impl PageQuery {
    /// Query with API defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Query for the first page with the given size
    pub fn first(size: u32) -> Self {
        Self {
            page: Some(1),
            size: Some(size),
            filters: Vec::new(),
        }
    }

    /// Add a filter parameter
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Same query moved to the cursor's position
    #[must_use]
    pub fn advance(&self, cursor: Cursor) -> Self {
        Self {
            page: Some(cursor.page),
            size: cursor.size.or(self.size),
            filters: self.filters.clone(),
        }
    }

    /// Query parameters for the request
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 2);
        if let Some(size) = self.size {
            params.push(("size".to_string(), size.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// Limits for a collection walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkConfig {
    /// Page size requested from the API
    pub page_size: u32,
    /// Maximum pages fetched in one walk
    pub max_pages: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 1000,
        }
    }
}

impl WalkConfig {
    /// Create a walk config
    pub fn new(page_size: u32, max_pages: usize) -> Self {
        Self {
            page_size,
            max_pages,
        }
    }
}

/// Why a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Last page had no `next` relation
    Exhausted,
    /// A page came back without items
    EmptyPage,
    /// The `next` link could not be parsed
    MalformedCursor,
    /// The `next` link did not move forward
    CursorStalled,
    /// The page cap was reached
    PageLimit,
    /// Fetching a follow-up page failed
    FetchFailed,
}

impl StopReason {
    /// Whether the walk saw the whole collection
    pub fn is_complete(self) -> bool {
        matches!(self, StopReason::Exhausted | StopReason::EmptyPage)
    }
}

/// Result of a collection walk
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    /// Accumulated summaries in page order
    pub records: Vec<SummaryRecord>,
    /// Number of pages fetched, the first included
    pub pages: usize,
    /// Why the walk ended
    pub stop: StopReason,
}

impl Walk {
    /// Consume into the accumulated summaries
    pub fn into_records(self) -> Vec<SummaryRecord> {
        self.records
    }
}
