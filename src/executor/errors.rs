//! Executor error types
//!
//! Error codes:
//! - REL_ITERATOR_MISUSE (FATAL)
//! - REL_CONFIGURATION_ERROR (FATAL)
//! - REL_ARITHMETIC_OVERFLOW (ERROR)
//! - tuple and storage codes are passed through unchanged
//!
//! Storage signals are wrapped without modification so a caller can still
//! tell a transaction abort from any other failure.

use thiserror::Error;

use crate::observability::Severity;
use crate::storage::StorageError;
use crate::tuple::TupleError;

/// Errors raised while building or running an operator tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// Index or type error from the tuple model
    #[error(transparent)]
    Tuple(#[from] TupleError),

    /// Signal from the storage collaborator
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// `next()` with nothing available, use of a Closed operator, or a
    /// merge into a finalized aggregator
    #[error("iterator misuse: {0}")]
    IteratorMisuse(String),

    /// Operator configuration rejected at construction time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An aggregate result does not fit its output type
    #[error("arithmetic overflow: {0}")]
    ArithmeticOverflow(String),
}

impl ExecError {
    pub fn misuse(reason: impl Into<String>) -> Self {
        ExecError::IteratorMisuse(reason.into())
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        ExecError::Configuration(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ExecError::Tuple(e) => e.code(),
            ExecError::Storage(e) => e.code(),
            ExecError::IteratorMisuse(_) => "REL_ITERATOR_MISUSE",
            ExecError::Configuration(_) => "REL_CONFIGURATION_ERROR",
            ExecError::ArithmeticOverflow(_) => "REL_ARITHMETIC_OVERFLOW",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecError::Tuple(e) => e.severity(),
            ExecError::Storage(e) => e.severity(),
            ExecError::IteratorMisuse(_) | ExecError::Configuration(_) => Severity::Fatal,
            ExecError::ArithmeticOverflow(_) => Severity::Error,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Whether the storage layer aborted the transaction
    pub fn is_transaction_aborted(&self) -> bool {
        matches!(
            self,
            ExecError::Storage(StorageError::TransactionAborted { .. })
        )
    }
}

/// Result type for executor operations
pub type ExecResult<T> = Result<T, ExecError>;
