//! Nested-loop join
//!
//! For each outer (left) tuple the inner (right) child is scanned from its
//! current position; when the inner side runs out it is rewound and the
//! next outer tuple is pulled. The pending outer tuple survives between
//! `fetch_next` calls so the loop resumes where it stopped.
//!
//! The inner child must support a correct and cheap `rewind`.

use std::sync::Arc;

use crate::tuple::{Schema, Tuple};

use super::errors::ExecResult;
use super::operator::{log_close, log_open, Cursor, Operator};
use super::predicate::JoinPredicate;

/// Joins two children on a `JoinPredicate`.
///
/// Output schema is `Schema::merge(left, right)`. Both join columns are
/// kept.
pub struct Join {
    predicate: JoinPredicate,
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    schema: Arc<Schema>,
    left_field_name: String,
    right_field_name: String,
    outer: Option<Tuple>,
    cursor: Cursor,
}

impl Join {
    pub fn new(
        predicate: JoinPredicate,
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
    ) -> ExecResult<Self> {
        let left_schema = left.schema();
        let right_schema = right.schema();
        predicate.validate(&left_schema, &right_schema)?;

        let left_field_name = left_schema.fields()[predicate.left_field()]
            .display_name()
            .to_string();
        let right_field_name = right_schema.fields()[predicate.right_field()]
            .display_name()
            .to_string();

        Ok(Self {
            predicate,
            left,
            right,
            schema: Arc::new(Schema::merge(&left_schema, &right_schema)),
            left_field_name,
            right_field_name,
            outer: None,
            cursor: Cursor::new(),
        })
    }

    pub fn predicate(&self) -> &JoinPredicate {
        &self.predicate
    }

    /// Name of the left join column, alias-qualified when the child is
    pub fn left_field_name(&self) -> &str {
        &self.left_field_name
    }

    /// Name of the right join column, alias-qualified when the child is
    pub fn right_field_name(&self) -> &str {
        &self.right_field_name
    }
}

impl Operator for Join {
    fn name(&self) -> &'static str {
        "join"
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn open(&mut self) -> ExecResult<()> {
        self.left.open()?;
        self.right.open()?;
        self.outer = None;
        self.cursor.open();
        log_open(self.name());
        Ok(())
    }

    fn close(&mut self) {
        self.cursor.close();
        self.outer = None;
        self.right.close();
        self.left.close();
        log_close(self.name());
    }

    fn rewind(&mut self) -> ExecResult<()> {
        self.cursor.reset()?;
        self.outer = None;
        self.left.rewind()?;
        self.right.rewind()
    }

    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>> {
        loop {
            if self.outer.is_none() {
                if !self.left.has_next()? {
                    return Ok(None);
                }
                self.outer = Some(self.left.next()?);
            }

            // the outer tuple stays pending if the inner side fails
            if let Some(outer) = &self.outer {
                while self.right.has_next()? {
                    let inner = self.right.next()?;
                    if self.predicate.evaluate(outer, &inner)? {
                        let joined = Tuple::concat(Arc::clone(&self.schema), outer, &inner)?;
                        return Ok(Some(joined));
                    }
                }
            }

            // inner exhausted for this outer tuple
            self.right.rewind()?;
            self.outer = None;
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
    use crate::executor::{collect, drain, CompareOp, TupleIterator};
    use crate::tuple::{Field, Type};

    fn ints(name: &str, values: &[i32]) -> Box<dyn Operator> {
        let schema = Arc::new(Schema::from_parts(&[Type::Integer], &[Some(name)]).unwrap());
        let tuples = values
            .iter()
            .map(|v| Tuple::from_fields(schema.clone(), vec![Field::Integer(*v)]).unwrap())
            .collect();
        Box::new(TupleIterator::new(schema, tuples).unwrap())
    }

    fn pairs(tuples: &[Tuple]) -> Vec<(i32, i32)> {
        tuples
            .iter()
            .map(|t| {
                (
                    t.field(0).unwrap().as_int().unwrap(),
                    t.field(1).unwrap().as_int().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_equi_join_all_pairs() {
        let jp = JoinPredicate::new(0, CompareOp::Equals, 0);
        let mut j = Join::new(jp, ints("a", &[1, 2, 2, 3]), ints("b", &[2, 3, 2, 4])).unwrap();
        let out = pairs(&collect(&mut j).unwrap());
        assert_eq!(out, vec![(2, 2), (2, 2), (2, 2), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_theta_join() {
        let jp = JoinPredicate::new(0, CompareOp::LessThan, 0);
        let mut j = Join::new(jp, ints("a", &[1, 2]), ints("b", &[1, 2, 3])).unwrap();
        let out = pairs(&collect(&mut j).unwrap());
        assert_eq!(out, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_join_schema_is_merge() {
        let jp = JoinPredicate::new(0, CompareOp::Equals, 0);
        let j = Join::new(jp, ints("a", &[]), ints("b", &[])).unwrap();
        assert_eq!(j.schema().num_fields(), 2);
        assert_eq!(j.schema().to_string(), "Integer(a), Integer(b)");
        assert_eq!(j.left_field_name(), "a");
        assert_eq!(j.right_field_name(), "b");
    }

    #[test]
    fn test_join_empty_inner() {
        let jp = JoinPredicate::new(0, CompareOp::Equals, 0);
        let mut j = Join::new(jp, ints("a", &[1, 2]), ints("b", &[])).unwrap();
        assert!(collect(&mut j).unwrap().is_empty());
    }

    #[test]
    fn test_join_rewind_mid_stream() {
        let jp = JoinPredicate::new(0, CompareOp::NotEquals, 0);
        let mut j = Join::new(jp, ints("a", &[1, 2, 3]), ints("b", &[1, 2, 3])).unwrap();
        j.open().unwrap();
        let first = drain(&mut j).unwrap();
        assert_eq!(first.len(), 6);

        j.rewind().unwrap();
        j.next().unwrap();
        j.next().unwrap();
        j.rewind().unwrap();
        let again = drain(&mut j).unwrap();
        assert_eq!(pairs(&first), pairs(&again));
    }

    #[test]
    fn test_inner_failure_keeps_pending_outer() {
        use crate::executor::Scan;
        use crate::storage::{InjectedFailure, MemoryPageStore, PageId, TransactionId};

        let schema = Arc::new(Schema::from_parts(&[Type::Integer], &[Some("v")]).unwrap());
        let row = |v: i32| Tuple::from_fields(schema.clone(), vec![Field::Integer(v)]).unwrap();
        let mut store = MemoryPageStore::new(2);
        let left = store.insert_table(schema.clone(), vec![row(1)]);
        let right = store.insert_table(schema.clone(), vec![row(1), row(1), row(1), row(1)]);
        store.inject_failure(PageId::new(right, 1), InjectedFailure::Abort);
        let store = Arc::new(store);

        let tid = TransactionId::next();
        let jp = JoinPredicate::new(0, CompareOp::Equals, 0);
        let mut j = Join::new(
            jp,
            Box::new(Scan::new(store.clone(), tid, left, schema.clone())),
            Box::new(Scan::new(store.clone(), tid, right, schema.clone())),
        )
        .unwrap();
        j.open().unwrap();

        assert_eq!(pairs(&[j.next().unwrap(), j.next().unwrap()]), vec![(1, 1), (1, 1)]);
        assert!(j.has_next().unwrap_err().is_transaction_aborted());

        // the caller clears the condition and keeps pulling
        store.clear_failure(PageId::new(right, 1));
        let rest = drain(&mut j).unwrap();
        assert_eq!(pairs(&rest), vec![(1, 1), (1, 1)]);
        j.close();
    }

    #[test]
    fn test_join_type_mismatch_rejected() {
        let text_schema = Arc::new(Schema::unnamed(&[Type::Text]).unwrap());
        let right = Box::new(TupleIterator::new(text_schema, vec![]).unwrap());
        let jp = JoinPredicate::new(0, CompareOp::Equals, 0);
        assert!(Join::new(jp, ints("a", &[]), right).is_err());
    }
}
