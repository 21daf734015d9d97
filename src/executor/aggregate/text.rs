//! Aggregation over Text columns: MIN, MAX (lexicographic) and COUNT

use std::sync::Arc;

use crate::executor::errors::{ExecError, ExecResult};
use crate::executor::tuple_iter::TupleIterator;
use crate::tuple::{Field, Schema, Tuple, TupleError, Type};

use super::groups::{group_key, into_results, Groups};
use super::{aggregate_schema, AggregateOp, AggregateSpec, Aggregator};

/// Text-domain aggregator. SUM and AVG are rejected at construction.
pub struct TextAggregator {
    spec: AggregateSpec,
    schema: Arc<Schema>,
    groups: Groups<String>,
}

impl TextAggregator {
    pub fn new(input: Arc<Schema>, spec: AggregateSpec) -> ExecResult<Self> {
        let source = input.field_type(spec.agg_field)?;
        if source != Type::Text {
            return Err(ExecError::configuration(format!(
                "text aggregator over a {} column",
                source
            )));
        }
        if !spec.op.supports(Type::Text) {
            return Err(ExecError::configuration(format!(
                "{} is not supported over Text values",
                spec.op
            )));
        }
        let schema = Arc::new(aggregate_schema(&input, &spec)?);
        Ok(Self {
            spec,
            schema,
            groups: Groups::new(),
        })
    }

    fn reduce(&self, values: Vec<String>) -> ExecResult<Field> {
        match self.spec.op {
            AggregateOp::Min => Ok(Field::Text(values.into_iter().min().unwrap_or_default())),
            AggregateOp::Max => Ok(Field::Text(values.into_iter().max().unwrap_or_default())),
            AggregateOp::Count => i32::try_from(values.len())
                .map(Field::Integer)
                .map_err(|_| ExecError::ArithmeticOverflow(format!("COUNT of {} rows", values.len()))),
            AggregateOp::Sum | AggregateOp::Avg => Err(ExecError::configuration(format!(
                "{} is not supported over Text values",
                self.spec.op
            ))),
        }
    }
}

impl Aggregator for TextAggregator {
    fn merge_tuple_into_group(&mut self, tuple: &Tuple) -> ExecResult<()> {
        let key = group_key(tuple, self.spec.group_field)?;
        let field = tuple.field(self.spec.agg_field)?;
        let value = field.as_text().ok_or(TupleError::TypeMismatch {
            expected: Type::Text,
            found: field.field_type(),
        })?;
        self.groups.push(key, value.to_string())
    }

    fn iterator(&mut self) -> ExecResult<TupleIterator> {
        let mut reduced = Vec::new();
        for (key, values) in self.groups.finish()? {
            reduced.push((key, self.reduce(values)?));
        }
        into_results(Arc::clone(&self.schema), reduced)
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::collect;
    use std::collections::HashMap;

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::from_parts(&[Type::Integer, Type::Text], &[Some("id"), Some("name")]).unwrap())
    }

    fn aggregate(spec: AggregateSpec, rows: &[(i32, &str)]) -> Vec<Tuple> {
        let s = schema();
        let mut agg = TextAggregator::new(s.clone(), spec).unwrap();
        for (id, name) in rows {
            let t = Tuple::from_fields(s.clone(), vec![Field::Integer(*id), Field::text(*name).unwrap()])
                .unwrap();
            agg.merge_tuple_into_group(&t).unwrap();
        }
        collect(&mut agg.iterator().unwrap()).unwrap()
    }

    #[test]
    fn test_sum_and_avg_rejected() {
        for op in [AggregateOp::Sum, AggregateOp::Avg] {
            let err = TextAggregator::new(schema(), AggregateSpec::ungrouped(1, op)).err().unwrap();
            assert!(matches!(err, ExecError::Configuration(_)));
        }
    }

    #[test]
    fn test_lexicographic_min_max() {
        let rows = [(1, "pear"), (1, "apple"), (2, "zebra"), (2, "Zebra")];
        let mins: HashMap<i32, String> = aggregate(AggregateSpec::new(1, Some(0), AggregateOp::Min), &rows)
            .iter()
            .map(|t| (t.field(0).unwrap().as_int().unwrap(), t.field(1).unwrap().to_string()))
            .collect();
        assert_eq!(mins[&1], "apple");
        assert_eq!(mins[&2], "Zebra");

        let out = aggregate(AggregateSpec::ungrouped(1, AggregateOp::Max), &rows);
        assert_eq!(out[0].field(0).unwrap(), &Field::text("zebra").unwrap());
    }

    #[test]
    fn test_count_yields_integer() {
        let rows = [(1, "a"), (1, "b"), (2, "c")];
        let out = aggregate(AggregateSpec::new(1, Some(0), AggregateOp::Count), &rows);
        assert_eq!(out[0].schema().to_string(), "Integer(id), Integer(COUNT name)");
        let counts: HashMap<i32, i32> = out
            .iter()
            .map(|t| (t.field(0).unwrap().as_int().unwrap(), t.field(1).unwrap().as_int().unwrap()))
            .collect();
        assert_eq!(counts, HashMap::from([(1, 2), (2, 1)]));
    }

    #[test]
    fn test_group_by_text_column() {
        let s = Arc::new(Schema::from_parts(&[Type::Text, Type::Text], &[Some("k"), Some("v")]).unwrap());
        let mut agg = TextAggregator::new(s.clone(), AggregateSpec::new(1, Some(0), AggregateOp::Count)).unwrap();
        for (k, v) in [("x", "1"), ("y", "2"), ("x", "3")] {
            let t = Tuple::from_fields(s.clone(), vec![Field::text(k).unwrap(), Field::text(v).unwrap()]).unwrap();
            agg.merge_tuple_into_group(&t).unwrap();
        }
        let out = collect(&mut agg.iterator().unwrap()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].to_string(), "x 2");
        assert_eq!(out[1].to_string(), "y 1");
    }
}
