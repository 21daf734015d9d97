//! In-memory storage collaborator
//!
//! Holds tables as lists of pages of tuples. Used by the CLI to serve
//! text-file tables and by tests to observe exactly which pages were
//! requested, under which transaction and permission.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::tuple::{RecordId, Schema, Tuple};

use super::errors::{StorageError, StorageResult};
use super::page::{PageId, PageSource, Permission, TableId, TransactionId};

/// Default number of tuples per page
pub const DEFAULT_TUPLES_PER_PAGE: usize = 64;

/// One recorded call to `fetch_page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFetch {
    pub tid: TransactionId,
    pub page_id: PageId,
    pub permission: Permission,
}

/// Failure to inject on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Fetch returns `TransactionAborted` for the calling transaction
    Abort,
    /// Fetch returns `Failure` with the given reason
    Fail(String),
}

struct StoredTable {
    schema: Arc<Schema>,
    pages: Vec<Vec<Tuple>>,
}

/// A `PageSource` backed by vectors
pub struct MemoryPageStore {
    tuples_per_page: usize,
    tables: HashMap<TableId, StoredTable>,
    next_table_id: TableId,
    fetch_log: Mutex<Vec<PageFetch>>,
    failures: Mutex<HashMap<PageId, InjectedFailure>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryPageStore {
    /// Creates an empty store. A page size of zero falls back to the default.
    pub fn new(tuples_per_page: usize) -> Self {
        Self {
            tuples_per_page: if tuples_per_page == 0 {
                DEFAULT_TUPLES_PER_PAGE
            } else {
                tuples_per_page
            },
            tables: HashMap::new(),
            next_table_id: 1,
            fetch_log: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the configured page size
    pub fn tuples_per_page(&self) -> usize {
        self.tuples_per_page
    }

    /// Stores `tuples` as a new table, split into pages
    pub fn insert_table(&mut self, schema: Arc<Schema>, tuples: Vec<Tuple>) -> TableId {
        let mut pages = Vec::new();
        let mut iter = tuples.into_iter().peekable();
        while iter.peek().is_some() {
            pages.push(iter.by_ref().take(self.tuples_per_page).collect());
        }
        self.insert_pages(schema, pages)
    }

    /// Stores a table with an explicit page layout (pages may be empty)
    pub fn insert_pages(&mut self, schema: Arc<Schema>, pages: Vec<Vec<Tuple>>) -> TableId {
        let table_id = self.next_table_id;
        self.next_table_id += 1;

        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(page_no, page)| {
                page.into_iter()
                    .enumerate()
                    .map(|(slot, mut t)| {
                        t.set_record_id(Some(RecordId::new(PageId::new(table_id, page_no), slot)));
                        t
                    })
                    .collect()
            })
            .collect();

        self.tables.insert(table_id, StoredTable { schema, pages });
        table_id
    }

    /// Returns the schema a table was stored with
    pub fn schema(&self, table_id: TableId) -> StorageResult<Arc<Schema>> {
        self.tables
            .get(&table_id)
            .map(|t| Arc::clone(&t.schema))
            .ok_or(StorageError::NoSuchTable(table_id))
    }

    /// Makes every later fetch of `page_id` fail
    pub fn inject_failure(&self, page_id: PageId, failure: InjectedFailure) {
        lock(&self.failures).insert(page_id, failure);
    }

    /// Removes an injected failure
    pub fn clear_failure(&self, page_id: PageId) {
        lock(&self.failures).remove(&page_id);
    }

    /// Returns every fetch made so far, in call order
    pub fn fetches(&self) -> Vec<PageFetch> {
        lock(&self.fetch_log).clone()
    }

    /// Forgets recorded fetches
    pub fn clear_fetches(&self) {
        lock(&self.fetch_log).clear();
    }
}

impl Default for MemoryPageStore {
    fn default() -> Self {
        Self::new(DEFAULT_TUPLES_PER_PAGE)
    }
}

impl PageSource for MemoryPageStore {
    fn page_count(&self, table_id: TableId) -> StorageResult<usize> {
        self.tables
            .get(&table_id)
            .map(|t| t.pages.len())
            .ok_or(StorageError::NoSuchTable(table_id))
    }

    fn fetch_page(
        &self,
        tid: TransactionId,
        page_id: PageId,
        permission: Permission,
    ) -> StorageResult<Vec<Tuple>> {
        lock(&self.fetch_log).push(PageFetch {
            tid,
            page_id,
            permission,
        });

        if let Some(failure) = lock(&self.failures).get(&page_id) {
            return Err(match failure {
                InjectedFailure::Abort => StorageError::aborted(tid),
                InjectedFailure::Fail(reason) => StorageError::failure(page_id, reason.clone()),
            });
        }

        let table = self
            .tables
            .get(&page_id.table_id)
            .ok_or(StorageError::NoSuchTable(page_id.table_id))?;

        table
            .pages
            .get(page_id.page_no)
            .cloned()
            .ok_or_else(|| StorageError::failure(page_id, "page number beyond end of table"))
    }
}
