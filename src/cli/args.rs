//! CLI argument definitions using clap
//!
//! Commands:
//! - recordkit check [--schema-dir <dir>]
//! - recordkit construct --type <name> [--schema-dir <dir>]
//! - recordkit window --symbol <s> --source <src> --days <n>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordkit - declarative record types with validated fields
#[derive(Parser, Debug)]
#[command(name = "recordkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every schema file and print the constructor signatures
    Check {
        /// Schema directory (overrides the config file)
        #[arg(long)]
        schema_dir: Option<PathBuf>,
    },

    /// Construct one record from a JSON request on stdin
    Construct {
        /// Schema directory (overrides the config file)
        #[arg(long)]
        schema_dir: Option<PathBuf>,

        /// Record type to construct
        #[arg(long = "type")]
        type_name: String,
    },

    /// Validate stock query inputs and print the date window
    Window {
        /// Ticker symbol
        #[arg(long)]
        symbol: String,

        /// Data source identifier
        #[arg(long)]
        source: String,

        /// Lookback in days
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
