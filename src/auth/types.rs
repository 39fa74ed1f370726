//! Auth configuration types
//!
//! Deserialized straight from the provider YAML. String fields may carry
//! `{{ env.NAME }}` placeholders that are resolved by [`AuthConfig::render`]
//! before the client is built.

use crate::error::Result;
use crate::template::{render, TemplateContext};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// Authentication configuration
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication (the usual ERS admin account)
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },

    /// API Key authentication (header or query)
    ApiKey {
        /// Where to place the API key
        #[serde(default)]
        location: Location,
        /// Header name (for header location)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header_name: Option<String>,
        /// Query parameter name (for query location)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query_param: Option<String>,
        /// Prefix to add before the value (e.g., "Token ")
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// Custom headers
    CustomHeaders {
        /// Headers to add to each request
        headers: StringMap,
    },
}

impl AuthConfig {
    /// Short name of the auth type
    pub fn type_name(&self) -> &'static str {
        match self {
            AuthConfig::None => "none",
            AuthConfig::Basic { .. } => "basic",
            AuthConfig::Bearer { .. } => "bearer",
            AuthConfig::ApiKey { .. } => "api_key",
            AuthConfig::CustomHeaders { .. } => "custom_headers",
        }
    }

    /// Resolve template placeholders in every secret-bearing field
    pub fn render(&self, ctx: &TemplateContext) -> Result<AuthConfig> {
        Ok(match self {
            AuthConfig::None => AuthConfig::None,
            AuthConfig::Basic { username, password } => AuthConfig::Basic {
                username: render(username, ctx)?,
                password: render(password, ctx)?,
            },
            AuthConfig::Bearer { token } => AuthConfig::Bearer {
                token: render(token, ctx)?,
            },
            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                prefix,
                value,
            } => AuthConfig::ApiKey {
                location: *location,
                header_name: header_name.clone(),
                query_param: query_param.clone(),
                prefix: prefix.clone(),
                value: render(value, ctx)?,
            },
            AuthConfig::CustomHeaders { headers } => AuthConfig::CustomHeaders {
                headers: headers
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), render(v, ctx)?)))
                    .collect::<Result<_>>()?,
            },
        })
    }
}

// secrets never reach the logs
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            AuthConfig::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
            AuthConfig::ApiKey {
                location,
                header_name,
                query_param,
                ..
            } => f
                .debug_struct("ApiKey")
                .field("location", location)
                .field("header_name", header_name)
                .field("query_param", query_param)
                .field("value", &"***")
                .finish(),
            AuthConfig::CustomHeaders { headers } => {
                let mut names: Vec<&String> = headers.keys().collect();
                names.sort();
                f.debug_struct("CustomHeaders").field("headers", &names).finish()
            }
        }
    }
}
