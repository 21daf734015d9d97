//! Sequential scan over the pages of one table
//!
//! Pages are fetched one at a time, in order, through the `PageSource`
//! under the tree's transaction id with `Permission::ReadOnly`. Empty
//! pages are skipped by looping, never by recursing.

use std::sync::Arc;
use std::vec;

use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::storage::{PageId, PageSource, Permission, TableId, TransactionId};
use crate::tuple::{Schema, Tuple};

use super::errors::ExecResult;
use super::operator::{log_close, log_open, Cursor, Operator};

/// Leaf operator bridging storage pages into the tuple stream
pub struct Scan {
    source: Arc<dyn PageSource>,
    tid: TransactionId,
    table_id: TableId,
    schema: Arc<Schema>,
    alias: Option<String>,
    num_pages: usize,
    page_no: usize,
    current: Option<vec::IntoIter<Tuple>>,
    metrics: Option<Arc<MetricsRegistry>>,
    cursor: Cursor,
}

impl Scan {
    pub fn new(
        source: Arc<dyn PageSource>,
        tid: TransactionId,
        table_id: TableId,
        schema: Arc<Schema>,
    ) -> Self {
        Self {
            source,
            tid,
            table_id,
            schema,
            alias: None,
            num_pages: 0,
            page_no: 0,
            current: None,
            metrics: None,
            cursor: Cursor::new(),
        }
    }

    /// Qualifies output column names as `alias.name`
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.schema = Arc::new(self.schema.with_prefix(&alias));
        self.alias = Some(alias);
        self
    }

    /// Counts fetched pages and scanned tuples into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.tid
    }

    fn fetch_page(&self, page_no: usize) -> ExecResult<vec::IntoIter<Tuple>> {
        let page_id = PageId::new(self.table_id, page_no);
        let table = self.table_id.to_string();
        let page = page_no.to_string();
        let tid = self.tid.to_string();
        log_event_with_fields(
            Event::PageFetch,
            &[("page", &page), ("table", &table), ("tid", &tid)],
        );
        if let Some(m) = &self.metrics {
            m.increment_pages_fetched();
        }
        let tuples = self
            .source
            .fetch_page(self.tid, page_id, Permission::ReadOnly)?;
        Ok(tuples.into_iter())
    }
}

impl Operator for Scan {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn open(&mut self) -> ExecResult<()> {
        self.num_pages = self.source.page_count(self.table_id)?;
        self.page_no = 0;
        self.current = None;
        self.cursor.open();
        log_open(self.name());
        Ok(())
    }

    fn close(&mut self) {
        self.cursor.close();
        self.current = None;
        self.page_no = 0;
        log_close(self.name());
    }

    /// Restarts at page 0, fetching it immediately
    fn rewind(&mut self) -> ExecResult<()> {
        self.cursor.reset()?;
        self.page_no = 0;
        self.current = None;
        if self.num_pages > 0 {
            self.current = Some(self.fetch_page(0)?);
        }
        Ok(())
    }

    fn fetch_next(&mut self) -> ExecResult<Option<Tuple>> {
        loop {
            if let Some(iter) = self.current.as_mut() {
                if let Some(mut tuple) = iter.next() {
                    tuple.reset_schema(Arc::clone(&self.schema))?;
                    if let Some(m) = &self.metrics {
                        m.increment_tuples_scanned();
                    }
                    return Ok(Some(tuple));
                }
                self.current = None;
                self.page_no += 1;
            }
            if self.page_no >= self.num_pages {
                return Ok(None);
            }
            self.current = Some(self.fetch_page(self.page_no)?);
        }
    }

    fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }
}
