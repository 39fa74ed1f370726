//! CLI commands and argument parsing

use crate::types::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reconcile ISE ERS / OpenAPI resources from the command line
#[derive(Parser, Debug)]
#[command(name = "ers-reconcile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Provider configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Resource kind (see `kinds`)
    #[arg(short, long, global = true)]
    pub kind: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log level after `--verbose`
    pub fn effective_log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List known resource kinds
    Kinds,

    /// Build an identifier from key fields
    Encode {
        /// Key fields as `name=value`, in order
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Show the key fields inside an identifier
    Decode {
        /// Identifier to decode
        identifier: String,
    },

    /// Read the resource behind an identifier
    Read {
        /// Identifier returned by create or import
        identifier: String,
    },

    /// Bind an identifier to an existing resource
    Import {
        /// Key fields as `name=value` (e.g. `name=Guest1`)
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Adopt or create a resource
    Create {
        /// Key fields as `name=value`
        #[arg(long = "key")]
        keys: Vec<String>,

        /// JSON object payload, or `@path` to read it from a file
        #[arg(long)]
        body: Option<String>,

        /// Optional boolean attribute as `name=true|false|` (empty leaves it unset)
        #[arg(long = "flag")]
        flags: Vec<String>,
    },

    /// Push a payload to an existing resource
    Update {
        /// Identifier returned by create or import
        identifier: String,

        /// JSON object payload, or `@path` to read it from a file
        #[arg(long)]
        body: Option<String>,

        /// Optional boolean attribute as `name=true|false|`
        #[arg(long = "flag")]
        flags: Vec<String>,
    },

    /// Delete the resource behind an identifier
    Delete {
        /// Identifier returned by create or import
        identifier: String,
    },
}

impl Commands {
    /// Check whether the command talks to the remote API
    pub fn is_remote(&self) -> bool {
        !matches!(
            self,
            Commands::Kinds | Commands::Encode { .. } | Commands::Decode { .. }
        )
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read() {
        let cli = Cli::try_parse_from([
            "ers-reconcile",
            "--config",
            "ise.yaml",
            "--kind",
            "guest_type",
            "read",
            "id=abc&name=Guest1",
        ])
        .unwrap();

        assert_eq!(cli.kind.as_deref(), Some("guest_type"));
        assert!(matches!(cli.command, Commands::Read { ref identifier } if identifier == "id=abc&name=Guest1"));
        assert!(cli.command.is_remote());
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_create_with_keys_and_flags() {
        let cli = Cli::try_parse_from([
            "ers-reconcile",
            "create",
            "--key",
            "name=SponsorA",
            "--flag",
            "isEnabled=true",
            "--body",
            "{\"description\":\"x\"}",
            "-k",
            "sponsor_group",
        ])
        .unwrap();

        match cli.command {
            Commands::Create { keys, body, flags } => {
                assert_eq!(keys, vec!["name=SponsorA"]);
                assert_eq!(flags, vec!["isEnabled=true"]);
                assert!(body.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let cli = Cli::try_parse_from(["ers-reconcile", "-v", "kinds"]).unwrap();
        assert_eq!(cli.effective_log_level(), LogLevel::Debug);
        assert!(!cli.command.is_remote());

        let cli = Cli::try_parse_from(["ers-reconcile", "--log-level", "warn", "kinds"]).unwrap();
        assert_eq!(cli.effective_log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_encode_requires_fields() {
        assert!(Cli::try_parse_from(["ers-reconcile", "encode"]).is_err());
    }
}
