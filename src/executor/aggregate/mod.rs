//! Grouped aggregation
//!
//! Two phases:
//!
//! 1. Accumulation: `merge_tuple_into_group` appends the aggregate value
//!    to its group's list
//! 2. Finalization: `iterator` reduces every list once and returns the
//!    materialized result
//!
//! Output schema is `(group, agg)` when grouped and `(agg)` otherwise. The
//! aggregate column is named `"<OP> <source name>"`.
//!
//! | op    | Integer | Text | output type |
//! |-------|---------|------|-------------|
//! | MIN   | yes     | yes  | source      |
//! | MAX   | yes     | yes  | source      |
//! | SUM   | yes     | no   | Integer     |
//! | AVG   | yes     | no   | Integer     |
//! | COUNT | yes     | yes  | Integer     |

mod groups;
mod integer;
mod node;
mod text;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tuple::{Schema, SchemaField, Tuple, Type};

use super::errors::{ExecError, ExecResult};
use super::tuple_iter::TupleIterator;

pub use integer::IntegerAggregator;
pub use node::Aggregate;
pub use text::TextAggregator;

/// Aggregate operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateOp {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl AggregateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
            AggregateOp::Sum => "SUM",
            AggregateOp::Avg => "AVG",
            AggregateOp::Count => "COUNT",
        }
    }

    /// Type of the aggregate column for a source column of type `source`
    pub fn output_type(&self, source: Type) -> Type {
        match self {
            AggregateOp::Min | AggregateOp::Max => source,
            AggregateOp::Sum | AggregateOp::Avg | AggregateOp::Count => Type::Integer,
        }
    }

    /// Whether this operator is defined over values of type `t`
    pub fn supports(&self, t: Type) -> bool {
        match t {
            Type::Integer => true,
            Type::Text => matches!(
                self,
                AggregateOp::Min | AggregateOp::Max | AggregateOp::Count
            ),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What to aggregate and how to group it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSpec {
    /// Input column being aggregated
    pub agg_field: usize,
    /// Input column to group by, `None` for a single group
    pub group_field: Option<usize>,
    pub op: AggregateOp,
}

impl AggregateSpec {
    pub fn new(agg_field: usize, group_field: Option<usize>, op: AggregateOp) -> Self {
        Self {
            agg_field,
            group_field,
            op,
        }
    }

    pub fn ungrouped(agg_field: usize, op: AggregateOp) -> Self {
        Self::new(agg_field, None, op)
    }
}

/// Accumulates tuples per group and reduces them on request
pub trait Aggregator {
    /// Adds one input tuple to its group
    fn merge_tuple_into_group(&mut self, tuple: &Tuple) -> ExecResult<()>;

    /// Finalizes and returns the results. Can be called once.
    fn iterator(&mut self) -> ExecResult<TupleIterator>;

    /// Output schema
    fn schema(&self) -> Arc<Schema>;
}

/// Synthetic name of the aggregate column
pub fn aggregate_column_name(input: &Schema, spec: &AggregateSpec) -> ExecResult<String> {
    let source = input.field_name(spec.agg_field)?.unwrap_or(crate::tuple::UNNAMED);
    Ok(format!("{} {}", spec.op, source))
}

/// Output schema of aggregating `input` with `spec`.
///
/// Validates both indices and that `spec.op` supports the aggregate
/// column's type.
pub fn aggregate_schema(input: &Schema, spec: &AggregateSpec) -> ExecResult<Schema> {
    let source_type = input.field_type(spec.agg_field)?;
    if !spec.op.supports(source_type) {
        return Err(ExecError::configuration(format!(
            "{} is not supported over {} values",
            spec.op, source_type
        )));
    }
    let agg_column = SchemaField::new(
        aggregate_column_name(input, spec)?,
        spec.op.output_type(source_type),
    );

    let fields = match spec.group_field {
        Some(g) => {
            let group_type = input.field_type(g)?;
            let group_column = SchemaField {
                name: input.field_name(g)?.map(str::to_string),
                field_type: group_type,
            };
            vec![group_column, agg_column]
        }
        None => vec![agg_column],
    };
    Ok(Schema::new(fields)?)
}

/// Picks the aggregator for the aggregate column's type
pub fn new_aggregator(input: Arc<Schema>, spec: AggregateSpec) -> ExecResult<Box<dyn Aggregator>> {
    match input.field_type(spec.agg_field)? {
        Type::Integer => Ok(Box::new(IntegerAggregator::new(input, spec)?)),
        Type::Text => Ok(Box::new(TextAggregator::new(input, spec)?)),
    }
}
