//! CLI module
//!
//! Command-line interface for reconciling one resource instance per run.
//!
//! # Commands
//!
//! - `kinds` - List known resource kinds
//! - `encode` / `decode` - Build or inspect an identifier
//! - `read` - Read the resource behind an identifier
//! - `import` - Bind an identifier from key fields
//! - `create` - Adopt a matching resource or create one
//! - `update` - Push a payload and read back
//! - `delete` - Delete, or forget kinds without a remote delete

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
