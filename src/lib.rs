// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # ers-reconcile
//!
//! Reconciliation engine that maps declarative resource instances onto a
//! paginated, multi-key REST management API (Cisco ISE ERS and OpenAPI
//! endpoints).
//!
//! ## Features
//!
//! - **Opaque identifiers**: ordered key fields (`id`, `name`, compound
//!   parts) encoded into one string the caller persists
//! - **Lookup selection**: by id, by name, by compound key, or a full listing
//! - **Pagination**: follows `next` cursors to the end with loop and page-cap guards
//! - **Adoption**: read-before-create, so a re-run never duplicates a resource
//! - **Soft not-found**: missing resources drop out of state instead of failing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ers_reconcile::{load_config, HttpClient, Reconciler, RestResource, Result};
//! use ers_reconcile::template::TemplateContext;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config("ise.yaml")?;
//!     let auth = config.resolved_auth(&TemplateContext::from_env())?;
//!     let client = HttpClient::with_auth(config.http_client_config(), auth)?;
//!     let guest_types = RestResource::new(Arc::new(client), config.resource("guest_type")?);
//!
//!     let reconciler = Reconciler::new(&guest_types).with_config(config.walk_config());
//!     let outcome = reconciler.read("name=Contractor").await;
//!     println!("present: {}", outcome.is_present());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Reconciler (engine)                       │
//! │  create → probe/adopt    read    update    delete    import   │
//! └───────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬────────────┬─────┴──────┬────────────┬─────────────┐
//! │  Codec   │   Lookup   │ Pagination │  Resolve   │  Resource   │
//! ├──────────┼────────────┼────────────┼────────────┼─────────────┤
//! │ encode   │ by id      │ walker     │ summary →  │ ResourceApi │
//! │ decode   │ by name    │ cursors    │ detail     │ RestResource│
//! │          │ compound   │ page cap   │            │ MockApi     │
//! └──────────┴────────────┴────────────┴────────────┴─────────────┘
//!                               │
//!                  HTTP (retry, rate limit) + Auth
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Opaque identifier codec
pub mod codec;

/// Lookup-method selection
pub mod lookup;

/// Paginated collection walking
pub mod pagination;

/// Summary to detail resolution
pub mod resolve;

/// Resource capability contract and REST adapter
pub mod resource;

/// Lifecycle engine
pub mod engine;

/// HTTP client with retry and rate limiting
pub mod http;

/// Authentication implementations
pub mod auth;

/// Provider configuration
pub mod config;

/// Built-in resource kind descriptors
pub mod catalog;

/// Template interpolation
pub mod template;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use codec::{decode, encode, KeyFields};
pub use config::{load_config, load_config_from_str, ProviderConfig, ResourceDefinition};
pub use engine::{
    Binding, CreateOutcome, DeleteOutcome, DesiredState, Observed, ReadOutcome, Reconciler,
};
pub use http::HttpClient;
pub use resource::{ResourceApi, ResourceKind, RestResource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
