//! Lifecycle engine
//!
//! Drives create, read, update, delete and import for one resource instance
//! against a [`ResourceApi`].
//!
//! # Overview
//!
//! - `Reconciler` - the lifecycle driver
//! - `AdoptionProbe` - read-before-create check
//! - `DesiredState`, `Observed` and the typed outcomes
//!
//! Not-found and listing failures are soft: Read reports `Absent`, Delete
//! reports `AlreadyAbsent`. Failed mutation calls are hard and come back as
//! [`Error::Mutation`] carrying the remote response body.

mod adopt;
mod types;

pub use adopt::{AdoptionProbe, ProbeResult};
pub use types::{Binding, CreateOutcome, DeleteOutcome, DesiredState, Observed, ReadOutcome};

use crate::codec::{decode, encode, KeyFields};
use crate::error::{Error, Result};
use crate::lookup::LookupMethod;
use crate::pagination::{CollectionWalker, WalkConfig};
use crate::resolve::{DetailResolver, LookupTarget};
use crate::resource::{DeleteSupport, DetailRecord, ResourceApi, ResourceKind, Target};
use crate::types::OptionStringExt;
use tracing::{debug, info, warn};

/// Lifecycle driver for one resource kind
pub struct Reconciler<'a> {
    api: &'a dyn ResourceApi,
    config: WalkConfig,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler with default walk limits
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

    fn kind(&self) -> &ResourceKind {
        self.api.kind()
    }

    /// Adopt a matching resource or create a new one, then read it back.
    ///
    /// At most one create call is issued.
    pub async fn create(&self, desired: &DesiredState) -> Result<CreateOutcome> {
        let kind = self.kind();
        let keys = kind.key_fields(&desired.keys);

        let probe = AdoptionProbe::new(self.api, self.config);
        let (binding, bound) = match probe.probe(&keys).await {
            ProbeResult::Existing(record) => {
                (Binding::Adopted, kind.bind(&keys, Some(&record), None))
            }
            ProbeResult::Missing => {
                let created = self
                    .api
                    .create(&desired.create_body(kind))
                    .await
                    .map_err(|e| Error::mutation("create", &kind.name, e))?;
                let remote_id = created.resolved_id();
                if remote_id.is_none() && !kind.has_compound_key() {
                    warn!(kind = %kind, "Create response carried no id");
                }
                (
                    Binding::Created,
                    kind.bind(&keys, created.record.as_ref(), remote_id.as_deref()),
                )
            }
        };

        let identifier = encode(&bound);
        info!(kind = %kind, identifier = %identifier, binding = %binding, "Bound resource");

        let state = self.read(&identifier).await;
        Ok(CreateOutcome {
            binding,
            identifier,
            state,
        })
    }

    /// Read the resource behind an identifier.
    ///
    /// Never fails: anything short of a fetched record is `Absent`.
    pub async fn read(&self, identifier: &str) -> ReadOutcome {
        let keys = decode(identifier);
        match self.locate(&keys).await {
            Some(record) => ReadOutcome::Present(self.observe(identifier, &keys, record)),
            None => {
                info!(kind = %self.kind(), identifier = %identifier, "Resource absent");
                ReadOutcome::Absent
            }
        }
    }

    /// Push a new payload to the resource, then read it back.
    ///
    /// The identifier is kept as-is; the follow-up read goes through the
    /// resolved remote id so a rename in the payload does not lose track.
    pub async fn update(&self, identifier: &str, desired: &DesiredState) -> Result<ReadOutcome> {
        let kind = self.kind();
        let keys = decode(identifier);

        let Some(record) = self.locate(&keys).await else {
            info!(kind = %kind, identifier = %identifier, "Update target absent");
            return Ok(ReadOutcome::Absent);
        };

        let target = Target::for_record(kind, &record, &keys);
        self.api
            .update(&target, &desired.payload)
            .await
            .map_err(|e| Error::mutation("update", &kind.name, e))?;
        info!(kind = %kind, target = %target, "Updated resource");

        let mut follow = keys.clone();
        match &target {
            Target::Id(id) => follow.insert("id", id.clone()),
            Target::Compound(compound) => {
                for (name, value) in compound.iter() {
                    follow.insert(name, value);
                }
            }
        }

        Ok(match self.locate(&follow).await {
            Some(record) => ReadOutcome::Present(self.observe(identifier, &follow, record)),
            None => ReadOutcome::Absent,
        })
    }

    /// Delete the resource behind an identifier
    pub async fn delete(&self, identifier: &str) -> Result<DeleteOutcome> {
        let kind = self.kind();

        if kind.delete == DeleteSupport::Unsupported {
            info!(kind = %kind, identifier = %identifier, "No remote delete, forgetting resource");
            return Ok(DeleteOutcome::Forgotten);
        }

        let keys = decode(identifier);
        let Some(record) = self.locate(&keys).await else {
            info!(kind = %kind, identifier = %identifier, "Delete target already absent");
            return Ok(DeleteOutcome::AlreadyAbsent);
        };

        let target = Target::for_record(kind, &record, &keys);
        match self.api.delete(&target).await {
            Ok(()) => {
                info!(kind = %kind, target = %target, "Deleted resource");
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) if e.is_not_found() => {
                info!(kind = %kind, target = %target, "Resource vanished before delete");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => Err(Error::mutation("delete", &kind.name, e)),
        }
    }

    /// Bind an identifier to an existing resource from user-supplied keys
    pub async fn import(&self, keys: &KeyFields) -> ReadOutcome {
        let kind = self.kind();
        let keys = kind.key_fields(keys);

        let Some(record) = self.locate(&keys).await else {
            info!(kind = %kind, keys = %keys, "Nothing to import");
            return ReadOutcome::Absent;
        };

        let bound = kind.bind(&keys, Some(&record), None);
        let identifier = encode(&bound);
        info!(kind = %kind, identifier = %identifier, "Imported resource");
        ReadOutcome::Present(self.observe(&identifier, &bound, record))
    }

    /// Find the detail record for a key field set using the selected lookup
    async fn locate(&self, keys: &KeyFields) -> Option<DetailRecord> {
        let kind = self.kind();
        let method = kind.plan().choose(keys);
        debug!(kind = %kind, method = %method, keys = %keys, "Locating resource");

        let fetched = match method {
            LookupMethod::ById => self.api.fetch_by_id(keys.value("id")).await,
            LookupMethod::ByName => self.api.fetch_by_name(keys.value("name")).await,
            LookupMethod::ByCompoundKey => self.api.fetch_by_compound_key(keys).await,
            LookupMethod::List => return self.locate_in_listing(keys).await,
        };

        match fetched {
            Ok(record) => record,
            Err(e) => {
                warn!(kind = %kind, method = %method, error = %e, "Lookup failed, treating as absent");
                None
            }
        }
    }

    async fn locate_in_listing(&self, keys: &KeyFields) -> Option<DetailRecord> {
        let kind = self.kind();
        let target = LookupTarget::from_keys(keys);
        if target.is_empty() {
            debug!(kind = %kind, "No id or name to match in listing");
            return None;
        }

        let walker = CollectionWalker::new(self.api).with_config(self.config);
        let walk = match walker.fetch_all(walker.first_query()).await {
            Ok(walk) => walk,
            Err(e) => {
                warn!(kind = %kind, error = %e, "Listing failed, treating as absent");
                return None;
            }
        };

        DetailResolver::new(self.api)
            .resolve(&walk.records, &target)
            .await
            .into_option()
    }

    /// Key fields refreshed from the record, falling back to the given ones
    fn observe(&self, identifier: &str, keys: &KeyFields, record: DetailRecord) -> Observed {
        let current = self
            .kind()
            .keys
            .iter()
            .map(|spec| {
                let value = record
                    .field_string(spec.source())
                    .none_if_empty()
                    .unwrap_or_else(|| keys.value(&spec.name).to_string());
                (spec.name.clone(), value)
            })
            .collect();
        Observed::new(identifier, current, record)
    }
}
