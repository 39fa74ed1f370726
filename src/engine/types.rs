//! Engine types
//!
//! Desired state going in, observed state and typed outcomes coming out.

use crate::codec::KeyFields;
use crate::resource::{DetailRecord, ResourceKind};
use crate::types::{JsonObject, JsonValue, TriState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What the caller wants to exist remotely
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredState {
    /// Identifying fields (`id`, `name`, compound parts)
    pub keys: KeyFields,
    /// Attributes sent on create and update
    pub payload: JsonObject,
}

impl DesiredState {
    /// Create an empty desired state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an identifying field
    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(name, value);
        self
    }

    /// Set a payload attribute
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.payload.insert(name.into(), value);
        self
    }

    /// Set an optional boolean; unset flags are left out of the payload
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, flag: TriState) -> Self {
        if let Some(value) = flag.as_option() {
            self.payload.insert(name.into(), JsonValue::Bool(value));
        }
        self
    }

    /// Create body: the payload plus any supplied key the payload lacks
    pub fn create_body(&self, kind: &ResourceKind) -> JsonObject {
        let mut body = self.payload.clone();
        for spec in &kind.keys {
            if spec.name == "id" || !self.keys.has(&spec.name) {
                continue;
            }
            body.entry(spec.source().to_string())
                .or_insert_with(|| JsonValue::String(self.keys.value(&spec.name).to_string()));
        }
        body
    }
}

/// Remote state as last seen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observed {
    /// Opaque identifier to persist
    pub identifier: String,
    /// Key fields as currently held by the remote record
    pub keys: KeyFields,
    /// Full detail record
    pub record: DetailRecord,
    /// Flattened record for drift comparison
    pub normalized: BTreeMap<String, JsonValue>,
    /// When the record was fetched
    pub observed_at: DateTime<Utc>,
}

impl Observed {
    /// Capture a fetched record
    pub fn new(identifier: impl Into<String>, keys: KeyFields, record: DetailRecord) -> Self {
        let normalized = record.normalize();
        Self {
            identifier: identifier.into(),
            keys,
            record,
            normalized,
            observed_at: Utc::now(),
        }
    }
}

/// Result of a read
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The resource exists
    Present(Observed),
    /// The resource is gone; the caller should drop its state
    Absent,
}

impl ReadOutcome {
    /// Check whether the resource exists
    pub fn is_present(&self) -> bool {
        matches!(self, ReadOutcome::Present(_))
    }

    /// Observed state, if present
    pub fn observed(&self) -> Option<&Observed> {
        match self {
            ReadOutcome::Present(observed) => Some(observed),
            ReadOutcome::Absent => None,
        }
    }

    /// Consume into the observed state
    pub fn into_observed(self) -> Option<Observed> {
        match self {
            ReadOutcome::Present(observed) => Some(observed),
            ReadOutcome::Absent => None,
        }
    }
}

/// How a create bound local state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// A matching resource already existed
    Adopted,
    /// A new resource was created
    Created,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Adopted => f.write_str("adopted"),
            Binding::Created => f.write_str("created"),
        }
    }
}

/// Result of a create
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome {
    /// Adopted or created
    pub binding: Binding,
    /// Opaque identifier to persist
    pub identifier: String,
    /// Follow-up read
    pub state: ReadOutcome,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The remote delete call succeeded
    Deleted,
    /// Nothing to delete
    AlreadyAbsent,
    /// The kind has no remote delete; only local state is dropped
    Forgotten,
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteOutcome::Deleted => f.write_str("deleted"),
            DeleteOutcome::AlreadyAbsent => f.write_str("already_absent"),
            DeleteOutcome::Forgotten => f.write_str("forgotten"),
        }
    }
}
