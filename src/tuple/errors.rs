//! Tuple model error types
//!
//! Error codes:
//! - REL_INDEX_OUT_OF_RANGE (FATAL)
//! - REL_TYPE_MISMATCH (FATAL)
//! - REL_SCHEMA_INVALID (FATAL)
//! - REL_NO_SUCH_FIELD (ERROR)
//! - REL_TEXT_TOO_LONG (ERROR)
//! - REL_TUPLE_PARSE_FAILED (ERROR)
//! - REL_TABLE_READ_FAILED (ERROR)
//!
//! Index and type errors are always caller bugs and are never recovered.

use thiserror::Error;

use crate::observability::Severity;

use super::field::{Type, TEXT_MAX_LEN};

/// Errors raised by the Field / Schema / Tuple model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    /// Field index outside `0..arity`
    #[error("field index {index} out of range for arity {arity}")]
    IndexOutOfRange { index: usize, arity: usize },

    /// Value variant does not match the declared type
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Type, found: Type },

    /// A schema must have at least one field
    #[error("schema must contain at least one field")]
    EmptySchema,

    /// Number of values (or names) does not match the schema
    #[error("arity mismatch: expected {expected}, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// No field carries the requested name
    #[error("no field named '{0}'")]
    NoSuchField(String),

    /// Text value exceeds the fixed Text width
    #[error("text value of {len} bytes exceeds the maximum of {}", TEXT_MAX_LEN)]
    TextTooLong { len: usize },

    /// Malformed line in the textual tuple format
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Table file could not be read
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

impl TupleError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TupleError::IndexOutOfRange { .. } => "REL_INDEX_OUT_OF_RANGE",
            TupleError::TypeMismatch { .. } => "REL_TYPE_MISMATCH",
            TupleError::EmptySchema | TupleError::ArityMismatch { .. } => "REL_SCHEMA_INVALID",
            TupleError::NoSuchField(_) => "REL_NO_SUCH_FIELD",
            TupleError::TextTooLong { .. } => "REL_TEXT_TOO_LONG",
            TupleError::Parse { .. } => "REL_TUPLE_PARSE_FAILED",
            TupleError::Io { .. } => "REL_TABLE_READ_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            TupleError::IndexOutOfRange { .. }
            | TupleError::TypeMismatch { .. }
            | TupleError::EmptySchema
            | TupleError::ArityMismatch { .. } => Severity::Fatal,
            TupleError::NoSuchField(_)
            | TupleError::TextTooLong { .. }
            | TupleError::Parse { .. }
            | TupleError::Io { .. } => Severity::Error,
        }
    }

    pub(crate) fn index(index: usize, arity: usize) -> Self {
        TupleError::IndexOutOfRange { index, arity }
    }
}

/// Result type for tuple model operations
pub type TupleResult<T> = Result<T, TupleError>;
