//! The pull-based operator protocol
//!
//! Every operator is a small state machine `Closed -> Open -> Closed` with
//! a single-tuple lookahead. Concrete operators only implement
//! `fetch_next`; `has_next` and `next` are provided on top of it.
//!
//! # Invariants
//!
//! - `has_next` is idempotent: without an intervening `next` it returns
//!   the same answer and pulls nothing new
//! - `next` hands out the lookahead exactly once
//! - `has_next`, `next` and `rewind` on a Closed operator fail with
//!   `IteratorMisuse`
//! - `close` is infallible, idempotent, and drops the lookahead

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event};
use crate::tuple::{Schema, Tuple};

use super::errors::{ExecError, ExecResult};

/// Lifecycle state of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Closed,
    Open,
}

/// Lifecycle state plus the one cached tuple, owned by each operator
#[derive(Debug, Default)]
pub struct Cursor {
    state: OpState,
    lookahead: Option<Tuple>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OpState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OpState::Open
    }

    /// Closed -> Open, with an empty lookahead
    pub fn open(&mut self) {
        self.state = OpState::Open;
        self.lookahead = None;
    }

    /// Any -> Closed, dropping the lookahead
    pub fn close(&mut self) {
        self.state = OpState::Closed;
        self.lookahead = None;
    }

    /// Fails with `IteratorMisuse` unless Open
    pub fn ensure_open(&self, action: &str) -> ExecResult<()> {
        if self.state != OpState::Open {
            return Err(ExecError::misuse(format!("{} on a closed operator", action)));
        }
        Ok(())
    }

    /// Drops the lookahead for a rewind. Only valid while Open.
    pub fn reset(&mut self) -> ExecResult<()> {
        self.ensure_open("rewind")?;
        self.lookahead = None;
        Ok(())
    }
}

/// A node of a pull-based operator tree
pub trait Operator {
    /// Short operator name used in logs
    fn name(&self) -> &'static str;

    /// Output schema
    fn schema(&self) -> Arc<Schema>;

    /// Opens children first, then this operator
    fn open(&mut self) -> ExecResult<()>;

    /// Closes this operator and its children
    fn close(&mut self);

    /// Restarts the stream from the beginning without reopening
    fn rewind(&mut self) -> ExecResult<()>;

    /// Produces the next logical tuple, or `None` at end of stream.
    ///
    /// Called only while Open. Must keep returning `None` once exhausted.
    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>>;

    fn cursor(&self) -> &Cursor;

    fn cursor_mut(&mut self) -> &mut Cursor;

    /// Whether another tuple is available, pulling one into the lookahead
    /// if needed
    fn has_next(&mut self) -> ExecResult<bool> {
        self.cursor().ensure_open("has_next")?;
        if self.cursor().lookahead.is_none() {
            let next = self.fetch_next()?;
            self.cursor_mut().lookahead = next;
        }
        Ok(self.cursor().lookahead.is_some())
    }

    /// Returns the next tuple, failing with `IteratorMisuse` at end of
    /// stream
    fn next(&mut self) -> ExecResult<Tuple> {
        if !self.has_next()? {
            return Err(ExecError::misuse(format!(
                "next called on exhausted {}",
                self.name()
            )));
        }
        self.cursor_mut()
            .lookahead
            .take()
            .ok_or_else(|| ExecError::misuse("lookahead vanished"))
    }
}

/// Pulls every remaining tuple out of an open operator
pub fn drain(op: &mut dyn Operator) -> ExecResult<Vec<Tuple>> {
    let mut out = Vec::new();
    while op.has_next()? {
        out.push(op.next()?);
    }
    Ok(out)
}

/// Opens, drains and closes an operator tree
pub fn collect(op: &mut dyn Operator) -> ExecResult<Vec<Tuple>> {
    op.open()?;
    let result = drain(op);
    op.close();
    result
}

pub(crate) fn log_open(name: &str) {
    log_event_with_fields(Event::OperatorOpen, &[("operator", name)]);
}

pub(crate) fn log_close(name: &str) {
    log_event_with_fields(Event::OperatorClose, &[("operator", name)]);
}
