//! Resource descriptors and record types

use crate::codec::KeyFields;
use crate::lookup::{LookupMethod, LookupPlan};
use crate::pagination::PageLink;
use crate::types::{json_path, scalar_to_string, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Records
// ============================================================================

/// Sparse listing entry. Only good for identifying a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Remote id
    #[serde(default)]
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Description, if the listing includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Self link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<PageLink>,
}

impl SummaryRecord {
    /// Create a summary with id and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Fully-populated view of one remote resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailRecord {
    fields: JsonObject,
}

impl DetailRecord {
    /// Wrap a JSON object
    pub fn new(fields: JsonObject) -> Self {
        Self { fields }
    }

    /// Build from any JSON value; non-objects are rejected
    pub fn from_value(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Remote id, when the record carries a non-empty one
    pub fn id(&self) -> Option<&str> {
        self.fields
            .get("id")
            .and_then(JsonValue::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Name, when the record carries a non-empty one
    pub fn name(&self) -> Option<&str> {
        self.fields
            .get("name")
            .and_then(JsonValue::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Raw field access (dotted paths allowed)
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        self.fields.get(path).or_else(|| {
            path.contains('.')
                .then(|| json_path_in(&self.fields, path))
                .flatten()
        })
    }

    /// Scalar field rendered as a string
    pub fn field_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(scalar_to_string)
    }

    /// Underlying JSON object
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Consume into the underlying JSON object
    pub fn into_fields(self) -> JsonObject {
        self.fields
    }

    /// Flatten nested objects into dotted keys for drift comparison.
    ///
    /// Arrays and scalars are kept as-is; `null` values are dropped.
    pub fn normalize(&self) -> BTreeMap<String, JsonValue> {
        let mut flat = BTreeMap::new();
        flatten_into(&mut flat, "", &self.fields);
        flat
    }
}

fn json_path_in<'a>(fields: &'a JsonObject, path: &str) -> Option<&'a JsonValue> {
    let (head, rest) = path.split_once('.')?;
    json_path(fields.get(head)?, rest)
}

fn flatten_into(flat: &mut BTreeMap<String, JsonValue>, prefix: &str, object: &JsonObject) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            JsonValue::Object(nested) => flatten_into(flat, &path, nested),
            JsonValue::Null => {}
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

// ============================================================================
// Kind descriptor
// ============================================================================

/// One identifying field of a resource kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Name used in key field sets and identifiers (e.g. `host_name`)
    pub name: String,
    /// Record attribute holding the value (e.g. `hostName`); defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl KeySpec {
    /// Key whose record attribute has the same name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
        }
    }

    /// Key backed by a differently-named record attribute
    pub fn mapped(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: Some(field.into()),
        }
    }

    /// Record attribute holding this key's value
    pub fn source(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

/// Whether the remote API offers a delete verb for a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteSupport {
    /// DELETE exists
    #[default]
    Remote,
    /// No delete endpoint; deleting only forgets local state
    Unsupported,
}

/// Runtime descriptor of a resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceKind {
    /// Kind name (e.g. `sponsor_group`)
    pub name: String,
    /// Identifying fields in identifier order
    pub keys: Vec<KeySpec>,
    /// Fields forming the compound key, if any
    pub compound_key: Vec<String>,
    /// Lookup methods in priority order; the first is the default
    pub lookups: Vec<LookupMethod>,
    /// Delete capability
    pub delete: DeleteSupport,
}

impl ResourceKind {
    /// Kind identified by `id` and `name`, looked up by id or listing
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: vec![KeySpec::new("id"), KeySpec::new("name")],
            compound_key: Vec::new(),
            lookups: vec![LookupMethod::List, LookupMethod::ById],
            delete: DeleteSupport::Remote,
        }
    }

    /// Replace the key fields
    #[must_use]
    pub fn with_keys(mut self, keys: Vec<KeySpec>) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the lookup methods
    #[must_use]
    pub fn with_lookups(mut self, lookups: Vec<LookupMethod>) -> Self {
        self.lookups = lookups;
        self
    }

    /// Set the compound key
    #[must_use]
    pub fn with_compound_key(mut self, fields: Vec<String>) -> Self {
        self.compound_key = fields;
        self
    }

    /// Set delete support
    #[must_use]
    pub fn with_delete(mut self, delete: DeleteSupport) -> Self {
        self.delete = delete;
        self
    }

    /// Lookup plan for this kind
    pub fn plan(&self) -> LookupPlan {
        LookupPlan::new(self.lookups.clone(), self.compound_key.clone())
    }

    /// Check whether the kind declares a compound key
    pub fn has_compound_key(&self) -> bool {
        !self.compound_key.is_empty()
    }

    /// Key field names in order
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }

    /// Keep only this kind's key fields, in declaration order
    pub fn key_fields(&self, supplied: &KeyFields) -> KeyFields {
        self.keys
            .iter()
            .map(|k| (k.name.clone(), supplied.value(&k.name).to_string()))
            .collect()
    }

    /// Bind key fields for a remote record.
    ///
    /// `id` comes from the remote side (explicit id, then the record); other
    /// fields keep the caller's value when given and fall back to the record.
    pub fn bind(
        &self,
        requested: &KeyFields,
        record: Option<&DetailRecord>,
        remote_id: Option<&str>,
    ) -> KeyFields {
        self.keys
            .iter()
            .map(|spec| {
                let from_record = || record.and_then(|r| r.field_string(spec.source()));
                let value = if spec.name == "id" {
                    remote_id
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .or_else(from_record)
                        .unwrap_or_else(|| requested.value("id").to_string())
                } else if requested.has(&spec.name) {
                    requested.value(&spec.name).to_string()
                } else {
                    from_record().unwrap_or_default()
                };
                (spec.name.clone(), value)
            })
            .collect()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Targets and mutation results
// ============================================================================

/// Effective address of a located resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Addressed by opaque remote id
    Id(String),
    /// Addressed by compound key
    Compound(KeyFields),
}

impl Target {
    /// Derive the target for a fetched record
    pub fn for_record(kind: &ResourceKind, record: &DetailRecord, keys: &KeyFields) -> Self {
        match record.id() {
            Some(id) => Target::Id(id.to_string()),
            None if kind.has_compound_key() => Target::Compound(kind.bind(keys, Some(record), None)),
            None => Target::Id(keys.value("id").to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Id(id) => write!(f, "id={id}"),
            Target::Compound(keys) => write!(f, "{keys}"),
        }
    }
}

/// Result of a create call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Created {
    /// Id reported explicitly by the API
    pub id: Option<String>,
    /// Location header of the response
    pub location: Option<String>,
    /// Record returned in the response body
    pub record: Option<DetailRecord>,
}

impl Created {
    /// Created resource with a known id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Created resource reported through a location header
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Default::default()
        }
    }

    /// Id of the new resource: explicit id, then the record, then the
    /// last path segment of the location header.
    pub fn resolved_id(&self) -> Option<String> {
        self.id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.record.as_ref().and_then(|r| r.id().map(str::to_string)))
            .or_else(|| self.location.as_deref().and_then(id_from_location))
    }
}

/// Last non-empty path segment of a location URL
fn id_from_location(location: &str) -> Option<String> {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(str::to_string)
}
