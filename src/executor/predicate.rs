//! Comparison predicates for Filter and Join
//!
//! Comparisons never coerce: both sides must carry the same `Type`, or
//! evaluation fails with `TypeMismatch`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tuple::{Field, Schema, Tuple, TupleError, TupleResult};

use super::errors::ExecResult;

/// Comparison kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEq,
    LessThan,
    LessThanOrEq,
    /// Substring containment for Text, equality for Integer
    Like,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equals => "=",
            CompareOp::NotEquals => "<>",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanOrEq => ">=",
            CompareOp::LessThan => "<",
            CompareOp::LessThanOrEq => "<=",
            CompareOp::Like => "LIKE",
        }
    }

    /// Evaluates `left <op> right`
    pub fn apply(&self, left: &Field, right: &Field) -> TupleResult<bool> {
        right.expect_type(left.field_type())?;
        let result = match self {
            CompareOp::Equals => left == right,
            CompareOp::NotEquals => left != right,
            CompareOp::GreaterThan => left > right,
            CompareOp::GreaterThanOrEq => left >= right,
            CompareOp::LessThan => left < right,
            CompareOp::LessThanOrEq => left <= right,
            CompareOp::Like => match (left, right) {
                (Field::Text(l), Field::Text(r)) => l.contains(r.as_str()),
                _ => left == right,
            },
        };
        Ok(result)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares one field of a tuple against a constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: usize,
    op: CompareOp,
    operand: Field,
}

impl Predicate {
    pub fn new(field: usize, op: CompareOp, operand: Field) -> Self {
        Self { field, op, operand }
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn operand(&self) -> &Field {
        &self.operand
    }

    /// Checks the field index and the operand type against `schema`
    pub fn validate(&self, schema: &Schema) -> TupleResult<()> {
        let expected = schema.field_type(self.field)?;
        self.operand.expect_type(expected)
    }

    /// Whether `tuple` satisfies the predicate
    pub fn evaluate(&self, tuple: &Tuple) -> ExecResult<bool> {
        Ok(self.op.apply(tuple.field(self.field)?, &self.operand)?)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field[{}] {} {}", self.field, self.op, self.operand)
    }
}

/// Compares a field of the outer tuple against a field of the inner one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPredicate {
    left_field: usize,
    op: CompareOp,
    right_field: usize,
}

impl JoinPredicate {
    pub fn new(left_field: usize, op: CompareOp, right_field: usize) -> Self {
        Self {
            left_field,
            op,
            right_field,
        }
    }

    pub fn left_field(&self) -> usize {
        self.left_field
    }

    pub fn right_field(&self) -> usize {
        self.right_field
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Checks both indices and that the two columns share a type
    pub fn validate(&self, left: &Schema, right: &Schema) -> TupleResult<()> {
        let left_type = left.field_type(self.left_field)?;
        let right_type = right.field_type(self.right_field)?;
        if left_type != right_type {
            return Err(TupleError::TypeMismatch {
                expected: left_type,
                found: right_type,
            });
        }
        Ok(())
    }

    /// Whether the pair satisfies the predicate
    pub fn evaluate(&self, left: &Tuple, right: &Tuple) -> ExecResult<bool> {
        let l = left.field(self.left_field)?;
        let r = right.field(self.right_field)?;
        Ok(self.op.apply(l, r)?)
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "left[{}] {} right[{}]",
            self.left_field, self.op, self.right_field
        )
    }
}
