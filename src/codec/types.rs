//! Key field set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered mapping from key field name to value.
///
/// Order is the declaration order of the resource kind's key fields and is
/// preserved through encode/decode. An empty value means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyFields(Vec<(String, String)>);

impl KeyFields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field, keeping its position if it already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Get a field value (None if the field is not in the set)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a field value, treating absence as empty
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Check if a field is present with a non-empty value
    pub fn has(&self, key: &str) -> bool {
        !self.value(key).is_empty()
    }

    /// Check that every listed field is present and non-empty
    pub fn has_all<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| self.has(k.as_ref()))
    }

    /// Iterate over `(key, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if no field carries a value
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|(_, v)| v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = KeyFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl fmt::Display for KeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
