//! CLI command implementations
//!
//! Both commands load the configuration, load every configured table into
//! a `MemoryPageStore`, then either run one operator tree or describe the
//! loaded tables.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::executor::{collect, ExecError, Operator};
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::storage::{MemoryPageStore, PageSource, TransactionId};
use crate::tuple::text::{load_table, render_tuples};

use super::args::Command;
use super::config::Config;
use super::errors::CliResult;
use super::io::{read_plan, write_output};
use super::plan::{Catalog, PlanNode};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { config, plan } => query(&config, plan.as_deref()),
        Command::Describe { config } => describe(&config),
    }
}

/// Load and validate the config, applying its log level
pub fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    let tables = config.tables.len().to_string();
    let path = config_path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", &path), ("tables", &tables)]);
    Ok(config)
}

/// Load every configured table into a fresh page store
pub fn load_catalog(config: &Config) -> CliResult<Catalog> {
    let mut store = MemoryPageStore::new(config.tuples_per_page);
    let mut tables = BTreeMap::new();

    for table in &config.tables {
        let schema = Arc::new(config.table_schema(table)?);
        let tuples = load_table(&config.table_path(table), &schema)?;
        let rows = tuples.len().to_string();
        let table_id = store.insert_table(Arc::clone(&schema), tuples);
        let pages = store.page_count(table_id).map_err(ExecError::from)?;

        log_event_with_fields(
            Event::TableLoaded,
            &[
                ("pages", &pages.to_string()),
                ("rows", &rows),
                ("table", &table.name),
            ],
        );
        tables.insert(table.name.clone(), (table_id, schema));
    }

    Ok(Catalog::new(store, tables))
}

/// Build and run one operator tree, returning the rendered result
pub fn execute_plan(
    catalog: &Catalog,
    plan_json: &str,
    metrics: &Arc<MetricsRegistry>,
) -> CliResult<String> {
    let tid = TransactionId::next();
    let tid_str = tid.to_string();
    log_event_with_fields(Event::QueryReceived, &[("tid", &tid_str)]);

    let result = PlanNode::from_json(plan_json)
        .and_then(|node| catalog.build(&node, tid, metrics))
        .and_then(|mut op| run_tree(op.as_mut()));

    match result {
        Ok(output) => {
            metrics.increment_queries_executed();
            metrics.add_tuples_emitted(output.lines().count() as u64);
            let snapshot = metrics.snapshot();
            log_event_with_fields(
                Event::QueryExecuted,
                &[
                    ("pages_fetched", &snapshot.pages_fetched.to_string()),
                    ("rows", &output.lines().count().to_string()),
                    ("tid", &tid_str),
                    ("tuples_scanned", &snapshot.tuples_scanned.to_string()),
                ],
            );
            Ok(output)
        }
        Err(e) => {
            metrics.increment_queries_failed();
            log_event_with_fields(
                Event::QueryFailed,
                &[("code", e.code_str()), ("message", e.message()), ("tid", &tid_str)],
            );
            Err(e)
        }
    }
}

fn run_tree(op: &mut dyn Operator) -> CliResult<String> {
    let tuples = collect(op)?;
    Ok(render_tuples(&tuples))
}

/// Execute a single operator tree and print its tuples
pub fn query(config_path: &Path, plan_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config)?;
    let plan = read_plan(plan_path)?;
    let metrics = Arc::new(MetricsRegistry::new());

    let output = execute_plan(&catalog, &plan, &metrics)?;
    write_output(&output)
}

/// Render name, schema and page count of every loaded table
pub fn describe_catalog(catalog: &Catalog) -> CliResult<String> {
    let mut out = String::new();
    for (name, table_id, schema) in catalog.tables() {
        let pages = catalog
            .store()
            .page_count(table_id)
            .map_err(ExecError::from)?;
        let _ = writeln!(out, "{}: {} [{} pages]", name, schema, pages);
    }
    Ok(out)
}

/// Print every configured table
pub fn describe(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(&config)?;
    write_output(&describe_catalog(&catalog)?)
}
