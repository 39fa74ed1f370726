//! Capability contract between the engine and a remote API

use super::types::{Created, DetailRecord, ResourceKind, Target};
use crate::codec::KeyFields;
use crate::error::{Error, Result};
use crate::pagination::{Page, PageQuery};
use crate::types::JsonObject;
use async_trait::async_trait;

/// Remote operations for one resource kind.
///
/// Fetches return `Ok(None)` when the resource does not exist and `Err` for
/// anything else, so callers can tell "not found" from a transport failure.
/// Optional lookups default to [`Error::UnsupportedLookup`].
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Descriptor of the kind served by this API
    fn kind(&self) -> &ResourceKind;

    /// Fetch the detail record by remote id
    async fn fetch_by_id(&self, id: &str) -> Result<Option<DetailRecord>>;

    /// Fetch the detail record by name
    async fn fetch_by_name(&self, _name: &str) -> Result<Option<DetailRecord>> {
        Err(Error::unsupported_lookup(&self.kind().name, "by_name"))
    }

    /// Fetch the detail record by compound key
    async fn fetch_by_compound_key(&self, _keys: &KeyFields) -> Result<Option<DetailRecord>> {
        Err(Error::unsupported_lookup(
            &self.kind().name,
            "by_compound_key",
        ))
    }

    /// Fetch one page of the collection listing
    async fn fetch_page(&self, query: &PageQuery) -> Result<Page>;

    /// Create a resource
    async fn create(&self, payload: &JsonObject) -> Result<Created>;

    /// Update a resource; returns the new record when the API sends one back
    async fn update(&self, target: &Target, payload: &JsonObject) -> Result<Option<DetailRecord>>;

    /// Delete a resource
    async fn delete(&self, _target: &Target) -> Result<()> {
        Err(Error::unsupported_operation(&self.kind().name, "delete"))
    }
}
