//! Storage collaborator error types
//!
//! Error codes:
//! - REL_STORAGE_FAILURE (ERROR)
//! - REL_TRANSACTION_ABORTED (ERROR)
//! - REL_NO_SUCH_TABLE (ERROR)
//!
//! These are opaque signals from the storage layer. Operators propagate
//! them unchanged and never retry.

use thiserror::Error;

use crate::observability::Severity;

use super::page::{PageId, TableId, TransactionId};

/// Errors raised by a `PageSource`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The page could not be produced
    #[error("storage failure on {page_id}: {reason}")]
    Failure { page_id: PageId, reason: String },

    /// The transaction was aborted while waiting on the page
    #[error("transaction {tid} aborted")]
    TransactionAborted { tid: TransactionId },

    /// The table id is unknown to the collaborator
    #[error("no such table: {0}")]
    NoSuchTable(TableId),
}

impl StorageError {
    /// Create a storage failure for a page
    pub fn failure(page_id: PageId, reason: impl Into<String>) -> Self {
        StorageError::Failure {
            page_id,
            reason: reason.into(),
        }
    }

    /// Create a transaction-abort signal
    pub fn aborted(tid: TransactionId) -> Self {
        StorageError::TransactionAborted { tid }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Failure { .. } => "REL_STORAGE_FAILURE",
            StorageError::TransactionAborted { .. } => "REL_TRANSACTION_ABORTED",
            StorageError::NoSuchTable(_) => "REL_NO_SUCH_TABLE",
        }
    }

    /// Storage signals are never caller bugs
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let pid = PageId::new(1, 2);
        assert_eq!(StorageError::failure(pid, "io").code(), "REL_STORAGE_FAILURE");
        assert_eq!(
            StorageError::aborted(TransactionId::from_raw(7)).code(),
            "REL_TRANSACTION_ABORTED"
        );
        assert_eq!(StorageError::NoSuchTable(3).code(), "REL_NO_SUCH_TABLE");
    }

    #[test]
    fn test_display_contains_context() {
        let err = StorageError::failure(PageId::new(4, 9), "disk gone");
        let display = err.to_string();
        assert!(display.contains("table 4 page 9"));
        assert!(display.contains("disk gone"));

        let err = StorageError::aborted(TransactionId::from_raw(12));
        assert_eq!(err.to_string(), "transaction tx-12 aborted");
        assert_eq!(err.severity(), Severity::Error);
    }
}
