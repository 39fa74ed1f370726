//! Common types used throughout ers-reconcile
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Whether repeating the request has the same effect as sending it once
    pub fn is_idempotent(self) -> bool {
        !matches!(self, Method::POST)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the CLI subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Tri-state Boolean
// ============================================================================

/// Optional boolean that keeps "not set" apart from "explicitly false".
///
/// Accepts `""`, `"true"`, `"false"`, JSON booleans and `null` on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "JsonValue", into = "Option<bool>")]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

impl TriState {
    /// Convert to an optional bool
    pub fn as_option(self) -> Option<bool> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(true),
            TriState::False => Some(false),
        }
    }

    /// Check whether a value was supplied
    pub fn is_set(self) -> bool {
        self != TriState::Unset
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => TriState::Unset,
            Some(true) => TriState::True,
            Some(false) => TriState::False,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        Some(value).into()
    }
}

impl From<TriState> for Option<bool> {
    fn from(value: TriState) -> Self {
        value.as_option()
    }
}

impl FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(TriState::Unset),
            "true" => Ok(TriState::True),
            "false" => Ok(TriState::False),
            other => Err(format!("expected \"\", \"true\" or \"false\", got \"{other}\"")),
        }
    }
}

impl TryFrom<JsonValue> for TriState {
    type Error = String;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Null => Ok(TriState::Unset),
            JsonValue::Bool(b) => Ok(b.into()),
            JsonValue::String(s) => s.parse(),
            other => Err(format!("expected a boolean, got {other}")),
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::Unset => Ok(()),
            TriState::True => f.write_str("true"),
            TriState::False => f.write_str("false"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Walk a dotted path (`a.b.c`, optional `$.` prefix) into a JSON value
pub fn json_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a scalar JSON value as a plain string
pub fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_method_conversion() {
        let get: reqwest::Method = Method::GET.into();
        assert_eq!(reqwest::Method::GET, get);
        let delete: reqwest::Method = Method::DELETE.into();
        assert_eq!(reqwest::Method::DELETE, delete);
    }

    #[test]
    fn test_method_idempotency() {
        assert!(Method::GET.is_idempotent());
        assert!(Method::PUT.is_idempotent());
        assert!(Method::DELETE.is_idempotent());
        assert!(!Method::POST.is_idempotent());
    }

    #[test_case("", TriState::Unset ; "empty string is unset")]
    #[test_case("true", TriState::True ; "true")]
    #[test_case("false", TriState::False ; "false")]
    fn test_tristate_from_str(input: &str, expected: TriState) {
        assert_eq!(input.parse::<TriState>().unwrap(), expected);
    }

    #[test]
    fn test_tristate_rejects_garbage() {
        assert!("yes".parse::<TriState>().is_err());
        assert!(TriState::try_from(json!(1)).is_err());
    }

    #[test]
    fn test_tristate_serde() {
        let values: Vec<TriState> =
            serde_json::from_value(json!([null, "", "true", false, true])).unwrap();
        assert_eq!(
            values,
            vec![
                TriState::Unset,
                TriState::Unset,
                TriState::True,
                TriState::False,
                TriState::True
            ]
        );

        assert_eq!(serde_json::to_value(TriState::False).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(TriState::Unset).unwrap(), json!(null));
    }

    #[test]
    fn test_tristate_keeps_false_apart_from_unset() {
        assert!(TriState::False.is_set());
        assert!(!TriState::Unset.is_set());
        assert_eq!(TriState::False.as_option(), Some(false));
        assert_eq!(TriState::Unset.as_option(), None);
    }

    #[test]
    fn test_json_path() {
        let value = json!({"SearchResult": {"total": 3, "nextPage": {"href": "x"}}});
        assert_eq!(json_path(&value, "SearchResult.total"), Some(&json!(3)));
        assert_eq!(
            json_path(&value, "$.SearchResult.nextPage.href"),
            Some(&json!("x"))
        );
        assert_eq!(json_path(&value, "SearchResult.missing"), None);
        assert_eq!(json_path(&value, ""), Some(&value));
    }

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(scalar_to_string(&json!("a")), Some("a".to_string()));
        assert_eq!(scalar_to_string(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_to_string(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_to_string(&json!({"a": 1})), None);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("".to_string().none_if_empty(), None);
    }
}
