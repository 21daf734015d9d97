//! Aggregation over Integer columns: MIN, MAX, SUM, AVG, COUNT

use std::sync::Arc;

use crate::executor::errors::{ExecError, ExecResult};
use crate::executor::tuple_iter::TupleIterator;
use crate::tuple::{Field, Schema, Tuple, TupleError, Type};

use super::groups::{group_key, into_results, Groups};
use super::{aggregate_schema, AggregateOp, AggregateSpec, Aggregator};

/// Integer-domain aggregator.
///
/// SUM and AVG accumulate in 64 bits. A SUM outside the Integer range
/// fails with `ArithmeticOverflow`. AVG truncates toward zero.
pub struct IntegerAggregator {
    spec: AggregateSpec,
    schema: Arc<Schema>,
    groups: Groups<i32>,
}

impl IntegerAggregator {
    pub fn new(input: Arc<Schema>, spec: AggregateSpec) -> ExecResult<Self> {
        let source = input.field_type(spec.agg_field)?;
        if source != Type::Integer {
            return Err(ExecError::configuration(format!(
                "integer aggregator over a {} column",
                source
            )));
        }
        let schema = Arc::new(aggregate_schema(&input, &spec)?);
        Ok(Self {
            spec,
            schema,
            groups: Groups::new(),
        })
    }

    fn reduce(&self, values: &[i32]) -> ExecResult<i32> {
        let count = values.len();
        match self.spec.op {
            AggregateOp::Min => Ok(values.iter().copied().min().unwrap_or_default()),
            AggregateOp::Max => Ok(values.iter().copied().max().unwrap_or_default()),
            AggregateOp::Count => i32::try_from(count)
                .map_err(|_| ExecError::ArithmeticOverflow(format!("COUNT of {} rows", count))),
            AggregateOp::Sum => {
                let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
                i32::try_from(sum)
                    .map_err(|_| ExecError::ArithmeticOverflow(format!("SUM {} exceeds Integer range", sum)))
            }
            AggregateOp::Avg => {
                if count == 0 {
                    return Ok(0);
                }
                let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
                let avg = sum / count as i64;
                i32::try_from(avg)
                    .map_err(|_| ExecError::ArithmeticOverflow(format!("AVG {} exceeds Integer range", avg)))
            }
        }
    }
}

impl Aggregator for IntegerAggregator {
    fn merge_tuple_into_group(&mut self, tuple: &Tuple) -> ExecResult<()> {
        let key = group_key(tuple, self.spec.group_field)?;
        let field = tuple.field(self.spec.agg_field)?;
        let value = field.as_int().ok_or(TupleError::TypeMismatch {
            expected: Type::Integer,
            found: field.field_type(),
        })?;
        self.groups.push(key, value)
    }

    fn iterator(&mut self) -> ExecResult<TupleIterator> {
        let mut reduced = Vec::new();
        for (key, values) in self.groups.finish()? {
            reduced.push((key, Field::Integer(self.reduce(&values)?)));
        }
        into_results(Arc::clone(&self.schema), reduced)
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}
