//! CLI module for databag
//!
//! Provides command-line interface for:
//! - check: load and summarize schemas
//! - decode: databag on stdin -> record on stdout
//! - encode: record on stdin -> databag on stdout

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, decode_bag, decode_command, encode_command, encode_record, resolve_schema, run,
    run_command, summarize,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
