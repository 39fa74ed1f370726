//! Template interpolation for YAML configs
//!
//! Handles `{{ variable }}` interpolation in provider configuration. Two
//! sources feed a context:
//!
//! - `{{ env.NAME }}` reads process environment variables (credentials)
//! - `{{ host_name }}` style names come from a resource's key fields and are
//!   used to address compound-key resources by URL path

use crate::codec::KeyFields;
use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

const ENV_PREFIX: &str = "env.";

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    vars: BTreeMap<String, String>,
    env: bool,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that resolves `env.*` from the process environment
    pub fn from_env() -> Self {
        Self {
            vars: BTreeMap::new(),
            env: true,
        }
    }

    /// Context holding a resource's key fields
    pub fn from_keys(keys: &KeyFields) -> Self {
        let mut ctx = Self::new();
        for (name, value) in keys.iter() {
            ctx.insert(name, value);
        }
        ctx
    }

    /// Add a variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Look up a variable; explicit variables shadow the environment
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if self.env {
            if let Some(var) = name.strip_prefix(ENV_PREFIX) {
                return std::env::var(var).ok();
            }
        }
        None
    }
}

/// Render a template string with the given context
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    substitute(template, ctx, |value| value.to_string())
}

/// Render a URL path template, encoding every substituted value as a
/// single path segment
pub fn render_path(template: &str, ctx: &TemplateContext) -> Result<String> {
    substitute(template, ctx, encode_path_segment)
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Percent-encode a value so it stays one path segment
pub fn encode_path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn substitute(
    template: &str,
    ctx: &TemplateContext,
    encode: impl Fn(&str) -> String,
) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let name = cap.get(1).map_or("", |m| m.as_str());
        match ctx.get(name) {
            Some(value) => encode(&value),
            None => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}
