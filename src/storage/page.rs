//! Page addressing and the page-fetch boundary
//!
//! The executor never reads pages itself. It asks a `PageSource` for the
//! tuples of one page under a transaction id and a permission level.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::tuple::Tuple;

use super::errors::StorageResult;

/// Table identifier assigned by the storage collaborator
pub type TableId = u32;

static NEXT_TRANSACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle threading all storage access within one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(u64);

impl TransactionId {
    /// Allocates a fresh, process-unique transaction id
    pub fn next() -> Self {
        TransactionId(NEXT_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps an id issued elsewhere
    pub fn from_raw(raw: u64) -> Self {
        TransactionId(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0)
    }
}

/// Address of one page: table plus 0-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId {
    pub table_id: TableId,
    pub page_no: usize,
}

impl PageId {
    pub fn new(table_id: TableId, page_no: usize) -> Self {
        Self { table_id, page_no }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {} page {}", self.table_id, self.page_no)
    }
}

/// Access level requested for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Shared access, sufficient for scans
    ReadOnly,
    /// Exclusive access, only for operators that mutate
    ReadWrite,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadOnly => "READ_ONLY",
            Permission::ReadWrite => "READ_WRITE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The storage collaborator as seen by the executor.
///
/// Implementations may block (e.g. while acquiring a page lock) and may
/// fail with `StorageError::TransactionAborted` or `StorageError::Failure`.
pub trait PageSource {
    /// Number of pages currently held by `table_id`
    fn page_count(&self, table_id: TableId) -> StorageResult<usize>;

    /// Returns the tuples stored on `page_id`, in slot order
    fn fetch_page(
        &self,
        tid: TransactionId,
        page_id: PageId,
        permission: Permission,
    ) -> StorageResult<Vec<Tuple>>;
}
