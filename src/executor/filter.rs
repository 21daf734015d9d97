//! Selection: passes through the child tuples that satisfy a predicate

use std::sync::Arc;

use crate::tuple::{Schema, Tuple};

use super::errors::ExecResult;
use super::operator::{log_close, log_open, Cursor, Operator};
use super::predicate::Predicate;

/// Filters its child's stream. Output schema equals the child's.
pub struct Filter {
    predicate: Predicate,
    child: Box<dyn Operator>,
    cursor: Cursor,
}

impl Filter {
    /// Fails with `IndexOutOfRange` or `TypeMismatch` if the predicate does
    /// not fit the child's schema
    pub fn new(predicate: Predicate, child: Box<dyn Operator>) -> ExecResult<Self> {
        predicate.validate(&child.schema())?;
        Ok(Self {
            predicate,
            child,
            cursor: Cursor::new(),
        })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn schema(&self) -> Arc<Schema> {
        self.child.schema()
    }

    fn open(&mut self) -> ExecResult<()> {
        self.child.open()?;
        self.cursor.open();
        log_open(self.name());
        Ok(())
    }

    fn close(&mut self) {
        self.cursor.close();
        self.child.close();
        log_close(self.name());
    }

    fn rewind(&mut self) -> ExecResult<()> {
        self.cursor.reset()?;
        self.child.rewind()
    }

    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>> {
        while self.child.has_next()? {
            let tuple = self.child.next()?;
            if self.predicate.evaluate(&tuple)? {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}
