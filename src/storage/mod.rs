//! Storage boundary for relexec
//!
//! The page format, buffer pool, lock manager and transaction machinery
//! live outside this crate. The executor only sees:
//!
//! - `PageSource::fetch_page(tid, page_id, permission)` returning tuples
//! - `StorageError::{Failure, TransactionAborted}` signals to propagate
//!
//! `MemoryPageStore` is an in-process implementation used by the CLI and
//! by tests.
//!
//! # Invariants
//!
//! - One transaction id per operator tree, passed through unchanged
//! - Scans request `Permission::ReadOnly`
//! - Storage errors are never retried inside the executor

mod errors;
mod memory;
mod page;

pub use errors::{StorageError, StorageResult};
pub use memory::{InjectedFailure, MemoryPageStore, PageFetch, DEFAULT_TUPLES_PER_PAGE};
pub use page::{PageId, PageSource, Permission, TableId, TransactionId};
