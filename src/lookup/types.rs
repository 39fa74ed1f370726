//! Lookup method and per-kind plan

use super::select_method;
use crate::codec::KeyFields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy for locating an existing remote resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMethod {
    /// Walk the whole collection and match locally
    #[default]
    List,
    /// Direct fetch by opaque remote id
    ById,
    /// Direct fetch by human-readable name
    ByName,
    /// Direct fetch by a multi-field key (e.g. host name + address)
    ByCompoundKey,
}

impl fmt::Display for LookupMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupMethod::List => "list",
            LookupMethod::ById => "by_id",
            LookupMethod::ByName => "by_name",
            LookupMethod::ByCompoundKey => "by_compound_key",
        };
        f.write_str(name)
    }
}

/// Ordered lookup methods for one resource kind.
///
/// The first method is the default and is expected to be [`LookupMethod::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPlan {
    methods: Vec<LookupMethod>,
    compound_key: Vec<String>,
}

impl LookupPlan {
    /// Create a plan from methods in priority order
    pub fn new(methods: Vec<LookupMethod>, compound_key: Vec<String>) -> Self {
        Self {
            methods,
            compound_key,
        }
    }

    /// Methods in priority order
    pub fn methods(&self) -> &[LookupMethod] {
        &self.methods
    }

    /// Check whether the plan offers a method
    pub fn supports(&self, method: LookupMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Presence vector for one method given the supplied key fields
    fn presence(&self, method: LookupMethod, keys: &KeyFields) -> Vec<bool> {
        match method {
            // listing takes no identifying input; it is only ever the fallback
            LookupMethod::List => Vec::new(),
            LookupMethod::ById => vec![keys.has("id")],
            LookupMethod::ByName => vec![keys.has("name")],
            LookupMethod::ByCompoundKey => vec![keys.has_all(self.compound_key.as_slice())],
        }
    }

    /// Choose the lookup method for a set of key fields
    pub fn choose(&self, keys: &KeyFields) -> LookupMethod {
        if self.methods.is_empty() {
            return LookupMethod::List;
        }

        let candidates: Vec<Vec<bool>> = self
            .methods
            .iter()
            .map(|method| self.presence(*method, keys))
            .collect();

        self.methods[select_method(&candidates)]
    }
}

impl Default for LookupPlan {
    fn default() -> Self {
        Self::new(
            vec![LookupMethod::List, LookupMethod::ById, LookupMethod::ByName],
            Vec::new(),
        )
    }
}
