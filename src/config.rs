//! Provider configuration
//!
//! A provider file describes how to reach one management endpoint (base URL,
//! credentials, transport tuning) and optionally adds or overrides resource
//! kind descriptors on top of the built-in catalog.
//!
//! ```yaml
//! base_url: https://ise.example.com:9060
//! insecure: true
//! auth:
//!   type: basic
//!   username: ersadmin
//!   password: "{{ env.ISE_PASSWORD }}"
//! pagination:
//!   page_size: 50
//! ```

use crate::auth::AuthConfig;
use crate::catalog;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::lookup::LookupMethod;
use crate::pagination::WalkConfig;
use crate::resource::{DeleteSupport, KeySpec, ResourceKind};
use crate::template::{extract_variables, TemplateContext};
use crate::types::{BackoffType, StringMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Provider Config
// ============================================================================

/// Complete provider configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the management API
    pub base_url: String,

    /// Accept self-signed certificates
    #[serde(default)]
    pub insecure: bool,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Listing walk limits
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Extra or overriding resource descriptors
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

impl ProviderConfig {
    /// Minimal config for a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Find a resource descriptor: provider file first, then the built-in catalog
    pub fn resource(&self, kind: &str) -> Result<ResourceDefinition> {
        if let Some(def) = self.resources.iter().find(|r| r.kind == kind) {
            return Ok(def.clone());
        }
        catalog::builtin_definition(kind)
    }

    /// Transport settings for the HTTP client
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff.backoff_type,
                Duration::from_millis(self.http.backoff.initial_ms),
                Duration::from_millis(self.http.backoff.max_ms),
            )
            .insecure(self.insecure);

        builder = match &self.http.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        for (key, value) in &self.http.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }

    /// Auth settings with `{{ env.* }}` placeholders resolved
    pub fn resolved_auth(&self, ctx: &TemplateContext) -> Result<AuthConfig> {
        self.auth.render(ctx)
    }

    /// Walk limits for listing
    pub fn walk_config(&self) -> WalkConfig {
        WalkConfig::new(self.pagination.page_size, self.pagination.max_pages)
    }

    /// Validate the whole config
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if self.pagination.page_size == 0 {
            return Err(Error::invalid_value("pagination.page_size", "must be positive"));
        }
        if self.pagination.max_pages == 0 {
            return Err(Error::invalid_value("pagination.max_pages", "must be positive"));
        }

        let mut seen = HashSet::new();
        for def in &self.resources {
            if !seen.insert(def.kind.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate resource kind '{}'",
                    def.kind
                )));
            }
            def.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries for idempotent requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff configuration
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Rate limiting; omit to use the default, `null` to disable
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: default_rate_limit(),
            headers: StringMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_ms: u64,

    /// Delay cap in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::default(),
            initial_ms: default_initial_backoff(),
            max_ms: default_max_backoff(),
        }
    }
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    30_000
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Listing walk limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Requested page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Hard cap on pages fetched per walk
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_max_pages() -> usize {
    1000
}

// ============================================================================
// Resource Definitions
// ============================================================================

/// Endpoint descriptor of one resource kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Kind name (e.g. `guest_type`)
    pub kind: String,

    /// Collection path; single resources live at `{path}/{id}`
    pub path: String,

    /// Top-level wrapper object around request and response bodies
    /// (e.g. `GuestType`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,

    /// Dotted path to the record in a detail response; defaults to the wrapper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_path: Option<String>,

    /// Dotted path to the summary array in a listing response
    #[serde(default = "default_items_path")]
    pub items_path: String,

    /// Dotted path to the next-page link in a listing response
    #[serde(default = "default_next_link_path")]
    pub next_link_path: String,

    /// Dotted path to the total count in a listing response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_path: Option<String>,

    /// Identifying fields in identifier order
    #[serde(default = "default_keys")]
    pub keys: Vec<KeySpec>,

    /// Lookup methods in priority order; `list` must come first
    #[serde(default = "default_lookups")]
    pub lookups: Vec<LookupMethod>,

    /// Path template for fetch-by-name (e.g. `/ers/config/guesttype/name/{{ name }}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_path: Option<String>,

    /// Path template for fetch-by-compound-key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compound_path: Option<String>,

    /// Key fields forming the compound key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_key: Vec<String>,

    /// Delete capability
    #[serde(default)]
    pub delete: DeleteSupport,
}

fn default_items_path() -> String {
    "SearchResult.resources".to_string()
}

fn default_next_link_path() -> String {
    "SearchResult.nextPage".to_string()
}

fn default_keys() -> Vec<KeySpec> {
    vec![KeySpec::new("id"), KeySpec::new("name")]
}

fn default_lookups() -> Vec<LookupMethod> {
    vec![LookupMethod::List, LookupMethod::ById]
}

impl ResourceDefinition {
    /// Descriptor with ERS defaults for a collection path
    pub fn new(kind: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: path.into(),
            wrapper: None,
            detail_path: None,
            items_path: default_items_path(),
            next_link_path: default_next_link_path(),
            total_path: None,
            keys: default_keys(),
            lookups: default_lookups(),
            name_path: None,
            compound_path: None,
            compound_key: Vec::new(),
            delete: DeleteSupport::default(),
        }
    }

    /// Runtime kind descriptor
    pub fn to_kind(&self) -> ResourceKind {
        ResourceKind::new(self.kind.clone())
            .with_keys(self.keys.clone())
            .with_lookups(self.lookups.clone())
            .with_compound_key(self.compound_key.clone())
            .with_delete(self.delete)
    }

    /// Dotted path of the record inside a detail response
    pub fn detail_path(&self) -> Option<&str> {
        self.detail_path.as_deref().or(self.wrapper.as_deref())
    }

    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        let field = |name: &str| format!("resources.{}.{name}", self.kind);

        if self.kind.trim().is_empty() {
            return Err(Error::missing_field("resources.kind"));
        }
        if self.path.trim().is_empty() {
            return Err(Error::missing_field(field("path")));
        }
        if self.keys.is_empty() {
            return Err(Error::invalid_value(field("keys"), "at least one key is required"));
        }

        let key_names: HashSet<&str> = self.keys.iter().map(|k| k.name.as_str()).collect();
        if key_names.len() != self.keys.len() {
            return Err(Error::invalid_value(field("keys"), "duplicate key name"));
        }

        if self.lookups.first() != Some(&LookupMethod::List) {
            return Err(Error::invalid_value(
                field("lookups"),
                "the listing lookup must be declared first",
            ));
        }

        if self.lookups.contains(&LookupMethod::ByName) {
            let Some(template) = &self.name_path else {
                return Err(Error::missing_field(field("name_path")));
            };
            self.check_template_vars(template, &key_names, &field("name_path"))?;
        }

        if self.lookups.contains(&LookupMethod::ByCompoundKey) {
            let Some(template) = &self.compound_path else {
                return Err(Error::missing_field(field("compound_path")));
            };
            if self.compound_key.is_empty() {
                return Err(Error::missing_field(field("compound_key")));
            }
            self.check_template_vars(template, &key_names, &field("compound_path"))?;
        }

        for part in &self.compound_key {
            if !key_names.contains(part.as_str()) {
                return Err(Error::invalid_value(
                    field("compound_key"),
                    format!("'{part}' is not a key field"),
                ));
            }
        }

        Ok(())
    }

    fn check_template_vars(
        &self,
        template: &str,
        key_names: &HashSet<&str>,
        field: &str,
    ) -> Result<()> {
        for var in extract_variables(template) {
            if !key_names.contains(var.as_str()) {
                return Err(Error::invalid_value(
                    field,
                    format!("'{var}' is not a key field"),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a provider config from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ProviderConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a provider config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<ProviderConfig> {
    let config: ProviderConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const PROVIDER: &str = r#"
base_url: https://ise.example.com:9060
insecure: true
auth:
  type: basic
  username: ersadmin
  password: "{{ env.ISE_PASSWORD }}"
http:
  timeout_secs: 10
  max_retries: 1
  backoff:
    type: constant
    initial_ms: 50
  rate_limit: null
  headers:
    ERS-Media-Type: identity.guesttype.1.0
pagination:
  page_size: 20
resources:
  - kind: guest_type
    path: /ers/config/guesttype
    wrapper: GuestTypeV2
"#;

    #[test]
    fn test_load_config_from_str() {
        let config = load_config_from_str(PROVIDER).unwrap();

        assert!(config.insecure);
        assert_eq!(config.auth.type_name(), "basic");
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.http.backoff.backoff_type, BackoffType::Constant);
        assert_eq!(config.http.backoff.max_ms, 30_000);
        assert!(config.http.rate_limit.is_none());
        assert_eq!(config.pagination.page_size, 20);
        assert_eq!(config.pagination.max_pages, 1000);
    }

    #[test]
    fn test_defaults() {
        let config = load_config_from_str("base_url: https://ise:9060").unwrap();
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.http.rate_limit, Some(RateLimiterConfig::default()));
        assert_eq!(config.walk_config(), WalkConfig::default());
        assert!(matches!(config.auth, AuthConfig::None));
    }

    #[test]
    fn test_http_client_config() {
        let config = load_config_from_str(PROVIDER).unwrap();
        let http = config.http_client_config();

        assert_eq!(http.base_url.as_deref(), Some("https://ise.example.com:9060"));
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(http.max_retries, 1);
        assert_eq!(http.initial_backoff, Duration::from_millis(50));
        assert!(http.rate_limit.is_none());
        assert!(http.insecure);
        assert_eq!(
            http.default_headers.get("ERS-Media-Type").map(String::as_str),
            Some("identity.guesttype.1.0")
        );
    }

    #[test]
    fn test_resolved_auth() {
        let config = load_config_from_str(PROVIDER).unwrap();
        let ctx = TemplateContext::new().with("env.ISE_PASSWORD", "pw");

        let auth = config.resolved_auth(&ctx).unwrap();
        assert_eq!(
            auth,
            AuthConfig::Basic {
                username: "ersadmin".to_string(),
                password: "pw".to_string(),
            }
        );
    }

    #[test]
    fn test_resource_override_and_catalog_fallback() {
        let config = load_config_from_str(PROVIDER).unwrap();

        let guest_type = config.resource("guest_type").unwrap();
        assert_eq!(guest_type.wrapper.as_deref(), Some("GuestTypeV2"));

        let sponsor_group = config.resource("sponsor_group").unwrap();
        assert_eq!(sponsor_group.path, "/ers/config/sponsorgroup");

        assert!(matches!(
            config.resource("printer"),
            Err(Error::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_validate_base_url() {
        assert!(matches!(
            load_config_from_str("base_url: ''"),
            Err(Error::MissingConfigField { .. })
        ));
        assert!(matches!(
            load_config_from_str("base_url: not a url"),
            Err(Error::InvalidConfigValue { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_kinds() {
        let mut config = ProviderConfig::new("https://ise:9060");
        config.resources = vec![
            ResourceDefinition::new("node", "/ers/config/node"),
            ResourceDefinition::new("node", "/ers/config/node"),
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_lookup_order() {
        let mut def = ResourceDefinition::new("node", "/ers/config/node");
        def.lookups = vec![LookupMethod::ById, LookupMethod::List];
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_validate_by_name_requires_path() {
        let mut def = ResourceDefinition::new("node", "/ers/config/node");
        def.lookups.push(LookupMethod::ByName);
        assert!(matches!(def.validate(), Err(Error::MissingConfigField { .. })));

        def.name_path = Some("/ers/config/node/name/{{ name }}".to_string());
        assert!(def.validate().is_ok());

        def.name_path = Some("/ers/config/node/name/{{ hostname }}".to_string());
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_validate_compound_key() {
        let mut def = ResourceDefinition::new("ipsec", "/api/v1/ipsec");
        def.keys = vec![
            KeySpec::mapped("host_name", "hostName"),
            KeySpec::mapped("nad_ip", "nadIp"),
        ];
        def.lookups.push(LookupMethod::ByCompoundKey);
        assert!(def.validate().is_err());

        def.compound_path = Some("/api/v1/ipsec/{{ host_name }}/{{ nad_ip }}".to_string());
        def.compound_key = vec!["host_name".to_string(), "nad_ip".to_string()];
        assert!(def.validate().is_ok());

        def.compound_key.push("id".to_string());
        assert!(def.validate().is_err());
    }

    #[test]
    fn test_to_kind() {
        let mut def = ResourceDefinition::new("connector_config", "/api/v1/fw/connector");
        def.delete = DeleteSupport::Unsupported;
        let kind = def.to_kind();

        assert_eq!(kind.name, "connector_config");
        assert_eq!(kind.delete, DeleteSupport::Unsupported);
        assert_eq!(kind.key_names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROVIDER.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.base_url, "https://ise.example.com:9060");
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
