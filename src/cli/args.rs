//! CLI argument definitions using clap
//!
//! Commands:
//! - databag check --config <path>
//! - databag decode --config <path> --schema <name> [--version <v>]
//! - databag encode --config <path> --schema <name> [--version <v>] [--mode <m>]
//!   [--base <path>] [--keep-existing]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::EncodeMode;

/// databag - typed codec for flat string-keyed databags
#[derive(Parser, Debug)]
#[command(name = "databag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every schema and print a summary
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./databag.json")]
        config: PathBuf,
    },

    /// Decode a databag read from stdin into a record
    Decode {
        /// Path to configuration file
        #[arg(long, default_value = "./databag.json")]
        config: PathBuf,

        /// Schema name
        #[arg(long)]
        schema: String,

        /// Schema version (latest if omitted)
        #[arg(long)]
        version: Option<String>,
    },

    /// Encode a record read from stdin into a databag
    Encode {
        /// Path to configuration file
        #[arg(long, default_value = "./databag.json")]
        config: PathBuf,

        /// Schema name
        #[arg(long)]
        schema: String,

        /// Schema version (latest if omitted)
        #[arg(long)]
        version: Option<String>,

        /// Override the encode mode (sparse or exhaustive)
        #[arg(long)]
        mode: Option<EncodeMode>,

        /// Existing databag (JSON file) to write into
        #[arg(long)]
        base: Option<PathBuf>,

        /// Keep entries of the base databag instead of clearing it
        #[arg(long)]
        keep_existing: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let cli = Cli::try_parse_from([
            "databag", "encode", "--schema", "cluster", "--mode", "exhaustive", "--keep-existing",
        ])
        .unwrap();

        match cli.command {
            Command::Encode {
                schema,
                mode,
                keep_existing,
                config,
                ..
            } => {
                assert_eq!(schema, "cluster");
                assert_eq!(mode, Some(EncodeMode::Exhaustive));
                assert!(keep_existing);
                assert_eq!(config, PathBuf::from("./databag.json"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_mode_rejected() {
        let result = Cli::try_parse_from(["databag", "encode", "--schema", "x", "--mode", "lazy"]);
        assert!(result.is_err());
    }
}
