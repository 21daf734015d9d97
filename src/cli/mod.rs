//! CLI module for relexec
//!
//! Provides command-line interface for:
//! - query: run one JSON operator tree over the configured tables
//! - describe: list the configured tables

mod args;
mod commands;
mod config;
mod errors;
mod io;
mod plan;

pub use args::{Cli, Command};
pub use commands::{
    describe, describe_catalog, execute_plan, load_catalog, load_config, query, run, run_command,
};
pub use config::{ColumnConfig, Config, TableConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_plan, write_output};
pub use plan::{Catalog, PlanNode};
