//! Execution counters
//!
//! Counters only, monotonic, relaxed atomics. A registry is shared by
//! `Arc` between the operators of one tree and whoever reports on it.

use std::sync::atomic::{AtomicU64, Ordering};

/// Registry of execution counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    pages_fetched: AtomicU64,
    tuples_scanned: AtomicU64,
    tuples_emitted: AtomicU64,
    queries_executed: AtomicU64,
    queries_failed: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub pages_fetched: u64,
    pub tuples_scanned: u64,
    pub tuples_emitted: u64,
    pub queries_executed: u64,
    pub queries_failed: u64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_pages_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_tuples_scanned(&self) {
        self.tuples_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_tuples_emitted(&self, n: u64) {
        self.tuples_emitted.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            tuples_scanned: self.tuples_scanned.load(Ordering::Relaxed),
            tuples_emitted: self.tuples_emitted.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(MetricsRegistry::new().snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_counters_increment() {
        let m = MetricsRegistry::new();
        m.increment_pages_fetched();
        m.increment_pages_fetched();
        m.increment_tuples_scanned();
        m.add_tuples_emitted(5);
        m.increment_queries_failed();

        let s = m.snapshot();
        assert_eq!(s.pages_fetched, 2);
        assert_eq!(s.tuples_scanned, 1);
        assert_eq!(s.tuples_emitted, 5);
        assert_eq!(s.queries_executed, 0);
        assert_eq!(s.queries_failed, 1);
    }
}
