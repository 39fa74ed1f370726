//! Adoption probe
//!
//! Before creating anything, look for a remote resource that already matches
//! the desired keys. Creation is not idempotent on the remote side (duplicate
//! names are accepted), so a re-run after an interrupted create must find what
//! the earlier run left behind.

use crate::codec::KeyFields;
use crate::lookup::LookupMethod;
use crate::pagination::{CollectionWalker, WalkConfig};
use crate::resolve::{DetailResolver, LookupTarget, Resolution};
use crate::resource::{DetailRecord, ResourceApi};
use tracing::{debug, warn};

/// Outcome of a probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    /// A matching resource exists
    Existing(DetailRecord),
    /// Nothing matches; safe to create
    Missing,
}

/// Looks for a pre-existing resource. Never mutates anything.
pub struct AdoptionProbe<'a> {
    api: &'a dyn ResourceApi,
    config: WalkConfig,
}

impl<'a> AdoptionProbe<'a> {
    /// Create a probe
    pub fn new(api: &'a dyn ResourceApi, config: WalkConfig) -> Self {
        Self { api, config }
    }

    /// Try id, then compound key, then the listing. Lookup failures count
    /// as "no match".
    pub async fn probe(&self, keys: &KeyFields) -> ProbeResult {
        let kind = self.api.kind();

        if keys.has("id") {
            match self.api.fetch_by_id(keys.value("id")).await {
                Ok(Some(record)) => {
                    debug!(kind = %kind, id = keys.value("id"), "Found existing resource by id");
                    return ProbeResult::Existing(record);
                }
                Ok(None) => {}
                Err(e) => warn!(kind = %kind, error = %e, "By-id probe failed"),
            }
        }

        if kind.plan().supports(LookupMethod::ByCompoundKey)
            && keys.has_all(kind.compound_key.as_slice())
        {
            match self.api.fetch_by_compound_key(keys).await {
                Ok(Some(record)) => {
                    debug!(kind = %kind, keys = %keys, "Found existing resource by compound key");
                    return ProbeResult::Existing(record);
                }
                Ok(None) => {}
                Err(e) => warn!(kind = %kind, error = %e, "Compound-key probe failed"),
            }
        }

        let target = LookupTarget::from_keys(keys);
        if target.is_empty() {
            return ProbeResult::Missing;
        }

        let walker = CollectionWalker::new(self.api).with_config(self.config);
        let walk = match walker.fetch_all(walker.first_query()).await {
            Ok(walk) => walk,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Listing probe failed");
                return ProbeResult::Missing;
            }
        };

        match DetailResolver::new(self.api).resolve(&walk.records, &target).await {
            Resolution::Found(record) => {
                debug!(kind = %kind, name = %target.name, "Found existing resource in listing");
                ProbeResult::Existing(record)
            }
            Resolution::NotFound | Resolution::Unavailable(_) => ProbeResult::Missing,
        }
    }
}
