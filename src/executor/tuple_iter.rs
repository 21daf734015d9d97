//! Operator over an in-memory tuple list
//!
//! Used for finalized aggregate results and as a leaf in tests.

use std::sync::Arc;

use crate::tuple::{Schema, Tuple};

use super::errors::ExecResult;
use super::operator::{log_close, log_open, Cursor, Operator};

/// A materialized, rewindable stream of tuples
#[derive(Debug)]
pub struct TupleIterator {
    schema: Arc<Schema>,
    tuples: Vec<Tuple>,
    position: usize,
    cursor: Cursor,
}

impl TupleIterator {
    /// Creates the iterator. Every tuple must be type-equal to `schema`.
    pub fn new(schema: Arc<Schema>, tuples: Vec<Tuple>) -> ExecResult<Self> {
        for t in &tuples {
            schema.check_type_equal(t.schema())?;
        }
        Ok(Self {
            schema,
            tuples,
            position: 0,
            cursor: Cursor::new(),
        })
    }

    /// Number of tuples held
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}

impl Operator for TupleIterator {
    fn name(&self) -> &'static str {
        "tuple_iterator"
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn open(&mut self) -> ExecResult<()> {
        self.position = 0;
        self.cursor.open();
        log_open(self.name());
        Ok(())
    }

    fn close(&mut self) {
        self.cursor.close();
        log_close(self.name());
    }

    fn rewind(&mut self) -> ExecResult<()> {
        self.cursor.reset()?;
        self.position = 0;
        Ok(())
    }

    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>> {
        let next = self.tuples.get(self.position).cloned();
        if next.is_some() {
            self.position += 1;
        }
        Ok(next)
    }

    fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}
