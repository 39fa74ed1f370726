//! Error types for ers-reconcile
//!
//! This module defines the error hierarchy for the whole crate.
//! Soft failures (not found, malformed cursors) are absorbed by the engine
//! before they reach this type's callers; whatever is returned as `Err` from
//! a lifecycle operation is fatal for that invocation.

use thiserror::Error;

/// The main error type for ers-reconcile
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Malformed pagination cursor '{href}': {message}")]
    Cursor { href: String, message: String },

    // ============================================================================
    // Resource Errors
    // ============================================================================
    #[error("Unknown resource kind: {kind}")]
    UnknownKind { kind: String },

    #[error("Resource kind '{kind}' does not support {method} lookup")]
    UnsupportedLookup { kind: String, method: String },

    #[error("Resource kind '{kind}' does not support {operation}")]
    UnsupportedOperation { kind: String, operation: String },

    #[error("Missing key field '{field}' for resource kind '{kind}'")]
    MissingKey { kind: String, field: String },

    #[error("{operation} {kind} failed: {message}")]
    Mutation {
        operation: String,
        kind: String,
        message: String,
        body: Option<String>,
    },

    // ============================================================================
    // Template Errors
    // ============================================================================
    #[error("Template error: {message}")]
    Template { message: String },

    #[error("Undefined variable in template: {variable}")]
    UndefinedVariable { variable: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a cursor error
    pub fn cursor(href: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cursor {
            href: href.into(),
            message: message.into(),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind { kind: kind.into() }
    }

    /// Create an unsupported lookup error
    pub fn unsupported_lookup(kind: impl Into<String>, method: impl Into<String>) -> Self {
        Self::UnsupportedLookup {
            kind: kind.into(),
            method: method.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(kind: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            kind: kind.into(),
            operation: operation.into(),
        }
    }

    /// Create a missing key error
    pub fn missing_key(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingKey {
            kind: kind.into(),
            field: field.into(),
        }
    }

    /// Wrap the failure of a remote mutation (create/update/delete).
    ///
    /// The remote response body is lifted out of `HttpStatus` errors so it
    /// shows up both in the message and in the `body` field.
    pub fn mutation(operation: impl Into<String>, kind: impl Into<String>, source: Error) -> Self {
        let body = source.response_body().map(str::to_string);
        Self::Mutation {
            operation: operation.into(),
            kind: kind.into(),
            message: source.to_string(),
            body,
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create an undefined variable error
    pub fn undefined_var(variable: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            variable: variable.into(),
        }
    }

    /// Remote response body attached to this error, if any
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::HttpStatus { body, .. } if !body.is_empty() => Some(body),
            Error::Mutation { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Check if this error means the remote resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HttpStatus { status: 404, .. })
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for ers-reconcile
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_key("ipsec", "nad_ip");
        assert_eq!(
            err.to_string(),
            "Missing key field 'nad_ip' for resource kind 'ipsec'"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_mutation_keeps_response_body() {
        let source = Error::http_status(400, "invalid phase_one_dhgroup");
        let err = Error::mutation("update", "ipsec", source);

        assert!(err.to_string().contains("invalid phase_one_dhgroup"));
        assert!(err.to_string().starts_with("update ipsec failed"));
        assert_eq!(err.response_body(), Some("invalid phase_one_dhgroup"));
    }

    #[test]
    fn test_mutation_without_body() {
        let err = Error::mutation("create", "guest_user", Error::Timeout { timeout_ms: 100 });
        assert_eq!(err.response_body(), None);
        assert!(err.to_string().contains("Request timeout after 100ms"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::http_status(404, "").is_not_found());
        assert!(!Error::http_status(400, "").is_not_found());
        assert!(!Error::config("x").is_not_found());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
