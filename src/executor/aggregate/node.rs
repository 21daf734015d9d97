//! The Aggregate operator: drains its child into an aggregator on open

use std::sync::Arc;

use crate::executor::errors::{ExecError, ExecResult};
use crate::executor::operator::{log_close, log_open, Cursor, Operator};
use crate::executor::tuple_iter::TupleIterator;
use crate::tuple::{Schema, Tuple};

use super::{aggregate_column_name, aggregate_schema, new_aggregator, AggregateOp, AggregateSpec};

/// Computes one aggregate, optionally grouped, over its child.
///
/// A fresh aggregator is built on every `open`, so close and reopen
/// recomputes instead of double counting.
pub struct Aggregate {
    child: Box<dyn Operator>,
    spec: AggregateSpec,
    schema: Arc<Schema>,
    results: Option<TupleIterator>,
    cursor: Cursor,
}

impl Aggregate {
    /// Fails if an index is out of range or `op` does not support the
    /// aggregate column's type
    pub fn new(
        child: Box<dyn Operator>,
        agg_field: usize,
        group_field: Option<usize>,
        op: AggregateOp,
    ) -> ExecResult<Self> {
        let spec = AggregateSpec::new(agg_field, group_field, op);
        let schema = Arc::new(aggregate_schema(&child.schema(), &spec)?);
        Ok(Self {
            child,
            spec,
            schema,
            results: None,
            cursor: Cursor::new(),
        })
    }

    /// Group-by column index in the input, if grouped
    pub fn group_field(&self) -> Option<usize> {
        self.spec.group_field
    }

    /// Name of the group-by column in the output, if grouped
    pub fn group_field_name(&self) -> Option<String> {
        self.spec.group_field.and_then(|g| {
            self.child
                .schema()
                .field_name(g)
                .ok()
                .flatten()
                .map(str::to_string)
        })
    }

    /// Aggregated column index in the input
    pub fn aggregate_field(&self) -> usize {
        self.spec.agg_field
    }

    /// Name of the aggregate column in the output, e.g. `SUM price`
    pub fn aggregate_field_name(&self) -> ExecResult<String> {
        aggregate_column_name(&self.child.schema(), &self.spec)
    }

    pub fn aggregate_op(&self) -> AggregateOp {
        self.spec.op
    }
}

impl Operator for Aggregate {
    fn name(&self) -> &'static str {
        "aggregate"
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn open(&mut self) -> ExecResult<()> {
        self.child.open()?;
        let mut aggregator = new_aggregator(self.child.schema(), self.spec)?;
        while self.child.has_next()? {
            let tuple = self.child.next()?;
            aggregator.merge_tuple_into_group(&tuple)?;
        }
        let mut results = aggregator.iterator()?;
        results.open()?;
        self.results = Some(results);
        self.cursor.open();
        log_open(self.name());
        Ok(())
    }

    fn close(&mut self) {
        self.cursor.close();
        if let Some(mut results) = self.results.take() {
            results.close();
        }
        self.child.close();
        log_close(self.name());
    }

    /// Rewinds the materialized result only; the child is not re-read
    fn rewind(&mut self) -> ExecResult<()> {
        self.cursor.reset()?;
        match self.results.as_mut() {
            Some(results) => results.rewind(),
            None => Err(ExecError::misuse("rewind before results exist")),
        }
    }

    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>> {
        let results = self
            .results
            .as_mut()
            .ok_or_else(|| ExecError::misuse("aggregate has no results"))?;
        if results.has_next()? {
            Ok(Some(results.next()?))
        } else {
            Ok(None)
        }
    }

    fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{collect, drain};
    use crate::tuple::{Field, Type};
    use std::collections::HashMap;

    fn child(rows: &[(i32, i32)]) -> Box<dyn Operator> {
        let schema = Arc::new(Schema::from_parts(&[Type::Integer, Type::Integer], &[Some("g"), Some("price")]).unwrap());
        let tuples = rows
            .iter()
            .map(|(g, v)| Tuple::from_fields(schema.clone(), vec![Field::Integer(*g), Field::Integer(*v)]).unwrap())
            .collect();
        Box::new(TupleIterator::new(schema, tuples).unwrap())
    }

    fn as_map(tuples: &[Tuple]) -> HashMap<i32, i32> {
        tuples
            .iter()
            .map(|t| (t.field(0).unwrap().as_int().unwrap(), t.field(1).unwrap().as_int().unwrap()))
            .collect()
    }

    #[test]
    fn test_grouped_sum() {
        let mut agg = Aggregate::new(child(&[(1, 5), (2, 1), (1, 5)]), 1, Some(0), AggregateOp::Sum).unwrap();
        assert_eq!(as_map(&collect(&mut agg).unwrap()), HashMap::from([(1, 10), (2, 1)]));
    }

    #[test]
    fn test_accessors() {
        let agg = Aggregate::new(child(&[]), 1, Some(0), AggregateOp::Avg).unwrap();
        assert_eq!(agg.group_field(), Some(0));
        assert_eq!(agg.group_field_name().as_deref(), Some("g"));
        assert_eq!(agg.aggregate_field(), 1);
        assert_eq!(agg.aggregate_field_name().unwrap(), "AVG price");
        assert_eq!(agg.aggregate_op(), AggregateOp::Avg);
        assert_eq!(agg.schema().to_string(), "Integer(g), Integer(AVG price)");

        let ungrouped = Aggregate::new(child(&[]), 1, None, AggregateOp::Count).unwrap();
        assert_eq!(ungrouped.group_field_name(), None);
    }

    #[test]
    fn test_reopen_does_not_double_count() {
        let mut agg = Aggregate::new(child(&[(1, 1), (1, 1)]), 1, None, AggregateOp::Count).unwrap();
        let first = collect(&mut agg).unwrap();
        let second = collect(&mut agg).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].field(0).unwrap(), &Field::Integer(2));
    }

    #[test]
    fn test_rewind_replays_results() {
        let mut agg = Aggregate::new(child(&[(1, 3), (2, 4)]), 1, Some(0), AggregateOp::Max).unwrap();
        agg.open().unwrap();
        let first = drain(&mut agg).unwrap();
        agg.rewind().unwrap();
        let second = drain(&mut agg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_child() {
        let mut agg = Aggregate::new(child(&[]), 1, None, AggregateOp::Sum).unwrap();
        assert!(collect(&mut agg).unwrap().is_empty());
    }

    #[test]
    fn test_bad_config_rejected_at_construction() {
        assert!(Aggregate::new(child(&[]), 2, None, AggregateOp::Sum).is_err());
        assert!(Aggregate::new(child(&[]), 1, Some(7), AggregateOp::Sum).is_err());
    }
}
