//! CLI module for recordkit
//!
//! Provides command-line interface for:
//! - check: Load schema files and print constructor signatures
//! - construct: Build one record from a JSON request on stdin
//! - window: Validate stock query inputs and print the date window

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, check_schemas, construct, construct_record, execute, load_registry, parse_arguments,
    resolve_window, run, run_command, window,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_request_from, write_error_to, write_response};
