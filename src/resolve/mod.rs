//! Detail resolution
//!
//! Listing entries are sparse. The resolver picks the one summary that
//! matches a target id (or, failing an id, a target name) and fetches its
//! detail record. At most one detail fetch is made per call, and only for the
//! matched entry.

use crate::codec::KeyFields;
use crate::error::Error;
use crate::resource::{DetailRecord, ResourceApi, SummaryRecord};
use tracing::{debug, warn};

/// What to look for in a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTarget {
    /// Target id (empty = not given)
    pub id: String,
    /// Target name (empty = not given)
    pub name: String,
}

impl LookupTarget {
    /// Create a target
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Target built from key fields
    pub fn from_keys(keys: &KeyFields) -> Self {
        Self::new(keys.value("id"), keys.value("name"))
    }

    /// Check that neither id nor name is given
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.name.is_empty()
    }

    /// Whether a summary is the one we are after.
    ///
    /// The id wins when given; the name is only consulted without one.
    pub fn matches(&self, summary: &SummaryRecord) -> bool {
        if !self.id.is_empty() {
            summary.id == self.id
        } else if !self.name.is_empty() {
            summary.name == self.name
        } else {
            false
        }
    }
}

/// Outcome of a resolution
#[derive(Debug)]
pub enum Resolution {
    /// Matched and fetched
    Found(DetailRecord),
    /// No summary matched, or the matched resource is gone
    NotFound,
    /// The detail fetch failed
    Unavailable(Error),
}

impl Resolution {
    /// Collapse into an option; both failure kinds mean "absent"
    pub fn into_option(self) -> Option<DetailRecord> {
        match self {
            Resolution::Found(record) => Some(record),
            Resolution::NotFound | Resolution::Unavailable(_) => None,
        }
    }

    /// Check if a record was found
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Resolves summaries into detail records
pub struct DetailResolver<'a> {
    api: &'a dyn ResourceApi,
}

impl<'a> DetailResolver<'a> {
    /// Create a resolver
    pub fn new(api: &'a dyn ResourceApi) -> Self {
        Self { api }
    }

    /// Find the matching summary and fetch its detail
    pub async fn resolve(&self, summaries: &[SummaryRecord], target: &LookupTarget) -> Resolution {
        let kind = &self.api.kind().name;

        let Some(summary) = summaries.iter().find(|s| target.matches(s)) else {
            debug!(kind = %kind, id = %target.id, name = %target.name, scanned = summaries.len(), "No listing entry matched");
            return Resolution::NotFound;
        };

        if summary.id.is_empty() {
            warn!(kind = %kind, name = %summary.name, "Matched listing entry has no id");
            return Resolution::NotFound;
        }

        match self.api.fetch_by_id(&summary.id).await {
            Ok(Some(record)) => Resolution::Found(record),
            Ok(None) => {
                debug!(kind = %kind, id = %summary.id, "Matched entry vanished before detail fetch");
                Resolution::NotFound
            }
            Err(e) => {
                warn!(kind = %kind, id = %summary.id, error = %e, "Detail fetch failed");
                Resolution::Unavailable(e)
            }
        }
    }
}

#[cfg(test)]
mod tests;
