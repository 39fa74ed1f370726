//! Authentication module
//!
//! Supports: Basic, Bearer, API Key, Custom Headers
//!
//! The management API authenticates every request independently, so the
//! `Authenticator` holds no token state.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, Location};
