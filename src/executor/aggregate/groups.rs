//! Group accumulation shared by the Integer and Text aggregators
//!
//! Values are appended per group key while accumulating. `finish`
//! hands the lists out exactly once; the map is then Finalized and every
//! further merge or finish fails with `IteratorMisuse`.

use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use crate::executor::errors::{ExecError, ExecResult};
use crate::executor::tuple_iter::TupleIterator;
use crate::observability::{log_event_with_fields, Event};
use crate::tuple::{Field, Schema, Tuple};

/// `None` is the no-grouping key
pub(crate) type GroupKey = Option<Field>;

enum GroupState<V> {
    Accumulating {
        values: HashMap<GroupKey, Vec<V>>,
        order: Vec<GroupKey>,
    },
    Finalized,
}

/// Per-group value lists, in first-seen group order
pub(crate) struct Groups<V> {
    state: GroupState<V>,
}

impl<V> Groups<V> {
    pub(crate) fn new() -> Self {
        Self {
            state: GroupState::Accumulating {
                values: HashMap::new(),
                order: Vec::new(),
            },
        }
    }

    pub(crate) fn push(&mut self, key: GroupKey, value: V) -> ExecResult<()> {
        match &mut self.state {
            GroupState::Accumulating { values, order } => {
                values
                    .entry(key)
                    .or_insert_with_key(|k| {
                        order.push(k.clone());
                        Vec::new()
                    })
                    .push(value);
                Ok(())
            }
            GroupState::Finalized => Err(ExecError::misuse("merge into a finalized aggregator")),
        }
    }

    /// Moves the accumulated lists out and marks the map Finalized
    pub(crate) fn finish(&mut self) -> ExecResult<Vec<(GroupKey, Vec<V>)>> {
        match mem::replace(&mut self.state, GroupState::Finalized) {
            GroupState::Accumulating { mut values, order } => Ok(order
                .into_iter()
                .filter_map(|k| values.remove(&k).map(|v| (k, v)))
                .collect()),
            GroupState::Finalized => Err(ExecError::misuse("aggregator already finalized")),
        }
    }
}

/// Reads the group key of `tuple`
pub(crate) fn group_key(tuple: &Tuple, group_field: Option<usize>) -> ExecResult<GroupKey> {
    match group_field {
        Some(i) => Ok(Some(tuple.field(i)?.clone())),
        None => Ok(None),
    }
}

/// Builds the materialized result stream from reduced groups
pub(crate) fn into_results(
    schema: Arc<Schema>,
    reduced: Vec<(GroupKey, Field)>,
) -> ExecResult<TupleIterator> {
    let groups = reduced.len().to_string();
    let mut tuples = Vec::with_capacity(reduced.len());
    for (key, value) in reduced {
        let fields = match key {
            Some(k) => vec![k, value],
            None => vec![value],
        };
        tuples.push(Tuple::from_fields(Arc::clone(&schema), fields)?);
    }
    log_event_with_fields(Event::AggregateFinalized, &[("groups", &groups)]);
    TupleIterator::new(schema, tuples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_keep_first_seen_order() {
        let mut g = Groups::new();
        g.push(Some(Field::Integer(2)), 1).unwrap();
        g.push(Some(Field::Integer(1)), 2).unwrap();
        g.push(Some(Field::Integer(2)), 3).unwrap();

        let out = g.finish().unwrap();
        assert_eq!(
            out,
            vec![
                (Some(Field::Integer(2)), vec![1, 3]),
                (Some(Field::Integer(1)), vec![2]),
            ]
        );
    }

    #[test]
    fn test_no_grouping_sentinel() {
        let mut g = Groups::new();
        g.push(None, 3).unwrap();
        g.push(None, 7).unwrap();
        assert_eq!(g.finish().unwrap(), vec![(None, vec![3, 7])]);
    }

    #[test]
    fn test_merge_after_finish_rejected() {
        let mut g: Groups<i32> = Groups::new();
        g.finish().unwrap();
        assert!(matches!(g.push(None, 1), Err(ExecError::IteratorMisuse(_))));
        assert!(matches!(g.finish(), Err(ExecError::IteratorMisuse(_))));
    }
}
