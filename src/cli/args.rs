//! CLI argument definitions using clap
//!
//! Commands:
//! - relexec query --config <path> [--plan <path>]
//! - relexec describe --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// relexec - a pull-based query executor over text-file tables
#[derive(Parser, Debug)]
#[command(name = "relexec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one JSON operator tree and print the result tuples
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./relexec.json")]
        config: PathBuf,

        /// Path to the operator tree; read from stdin when absent
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Print every configured table with its schema and page count
    Describe {
        /// Path to configuration file
        #[arg(long, default_value = "./relexec.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
