//! JSON operator trees
//!
//! ```json
//! { "op": "aggregate", "agg_field": 1, "group_field": 0, "agg": "COUNT",
//!   "child": { "op": "filter", "field": 0, "cmp": "greater_than", "value": 0,
//!              "child": { "op": "scan", "table": "people" } } }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::executor::{
    Aggregate, AggregateOp, CompareOp, Filter, Join, JoinPredicate, Operator, Predicate, Scan,
};
use crate::observability::MetricsRegistry;
use crate::storage::{MemoryPageStore, PageSource, TableId, TransactionId};
use crate::tuple::{Field, Schema};

use super::errors::{CliError, CliResult};

/// One node of an operator tree, tagged by `op`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanNode {
    Scan {
        table: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    Filter {
        child: Box<PlanNode>,
        field: usize,
        cmp: CompareOp,
        value: Field,
    },
    Join {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        left_field: usize,
        cmp: CompareOp,
        right_field: usize,
    },
    Aggregate {
        child: Box<PlanNode>,
        agg_field: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_field: Option<usize>,
        agg: AggregateOp,
    },
}

impl PlanNode {
    /// Parses an operator tree from JSON
    pub fn from_json(raw: &str) -> CliResult<Self> {
        if raw.trim().is_empty() {
            return Err(CliError::plan_error("empty operator tree"));
        }
        Ok(serde_json::from_str(raw)?)
    }
}

/// Loaded tables available to scans
pub struct Catalog {
    store: Arc<MemoryPageStore>,
    tables: BTreeMap<String, (TableId, Arc<Schema>)>,
}

impl Catalog {
    pub fn new(store: MemoryPageStore, tables: BTreeMap<String, (TableId, Arc<Schema>)>) -> Self {
        Self {
            store: Arc::new(store),
            tables,
        }
    }

    pub fn store(&self) -> &MemoryPageStore {
        &self.store
    }

    /// Table names in sorted order with their id and schema
    pub fn tables(&self) -> impl Iterator<Item = (&str, TableId, &Arc<Schema>)> {
        self.tables
            .iter()
            .map(|(name, (id, schema))| (name.as_str(), *id, schema))
    }

    fn lookup(&self, name: &str) -> CliResult<(TableId, Arc<Schema>)> {
        self.tables
            .get(name)
            .map(|(id, schema)| (*id, Arc::clone(schema)))
            .ok_or_else(|| CliError::plan_error(format!("unknown table: '{}'", name)))
    }

    /// Builds an executable operator tree. Every scan runs under `tid`.
    pub fn build(
        &self,
        node: &PlanNode,
        tid: TransactionId,
        metrics: &Arc<MetricsRegistry>,
    ) -> CliResult<Box<dyn Operator>> {
        let op: Box<dyn Operator> = match node {
            PlanNode::Scan { table, alias } => {
                let (table_id, schema) = self.lookup(table)?;
                let source: Arc<dyn PageSource> = self.store.clone();
                let scan = Scan::new(source, tid, table_id, schema).with_metrics(Arc::clone(metrics));
                match alias {
                    Some(alias) => Box::new(scan.with_alias(alias.clone())),
                    None => Box::new(scan),
                }
            }
            PlanNode::Filter {
                child,
                field,
                cmp,
                value,
            } => {
                let value = match value {
                    Field::Text(s) => Field::text(s.clone())?,
                    other => other.clone(),
                };
                let child = self.build(child, tid, metrics)?;
                Box::new(Filter::new(Predicate::new(*field, *cmp, value), child)?)
            }
            PlanNode::Join {
                left,
                right,
                left_field,
                cmp,
                right_field,
            } => {
                let left = self.build(left, tid, metrics)?;
                let right = self.build(right, tid, metrics)?;
                let predicate = JoinPredicate::new(*left_field, *cmp, *right_field);
                Box::new(Join::new(predicate, left, right)?)
            }
            PlanNode::Aggregate {
                child,
                agg_field,
                group_field,
                agg,
            } => {
                let child = self.build(child, tid, metrics)?;
                Box::new(Aggregate::new(child, *agg_field, *group_field, *agg)?)
            }
        };
        Ok(op)
    }
}
