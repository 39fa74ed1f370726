//! Resource capability contract
//!
//! The engine never talks HTTP directly. It drives a [`ResourceApi`] per
//! resource kind, described by a [`ResourceKind`]:
//!
//! - `fetch_by_id`, `fetch_by_name`, `fetch_by_compound_key` for direct lookups
//! - `fetch_page` for the collection listing
//! - `create`, `update`, `delete` for mutations
//!
//! [`rest::RestResource`] is the production implementation.

mod api;
pub mod rest;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use api::ResourceApi;
pub use rest::RestResource;
pub use types::{
    Created, DeleteSupport, DetailRecord, KeySpec, ResourceKind, SummaryRecord, Target,
};
