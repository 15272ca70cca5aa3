//! Cache Statistics Module
//!
//! Tracks hits, misses, byte volumes and per-operation success and error
//! counts.

use parking_lot::Mutex;
use serde::Serialize;

// == Stats ==
/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Reads that found the key
    pub hits: u64,
    /// Reads that did not find the key
    pub misses: u64,
    /// Encoded bytes returned by hits
    pub read_bytes: u64,
    /// Encoded bytes stored by writes
    pub write_bytes: u64,
    /// Completed reads (hits + misses)
    pub read_count: u64,
    /// Completed writes
    pub write_count: u64,
    /// Completed deletes
    pub delete_count: u64,
    /// Completed clears
    pub clear_count: u64,
    /// Failed reads
    pub err_read_count: u64,
    /// Failed writes
    pub err_write_count: u64,
    /// Failed deletes
    pub err_delete_count: u64,
    /// Failed clears
    pub err_clear_count: u64,
}

impl Stats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have completed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits.saturating_add(self.misses);
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Sync Stats ==
/// Concurrency-safe counters behind a single lock.
///
/// Every record call and every snapshot takes the lock, so a snapshot never
/// shows a half-applied update.
#[derive(Debug, Default)]
pub struct SyncStats {
    inner: Mutex<Stats>,
}

impl SyncStats {
    // == Constructor ==
    /// Creates a collector with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Snapshot ==
    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> Stats {
        *self.inner.lock()
    }

    // == Reset ==
    /// Sets every counter to zero.
    pub fn reset(&self) {
        *self.inner.lock() = Stats::default();
    }

    // == Record Read ==
    /// Records a completed read; `bytes` only counts on a hit.
    pub fn record_read(&self, hit: bool, bytes: usize) {
        let mut s = self.inner.lock();
        s.read_count = s.read_count.saturating_add(1);
        if hit {
            s.hits = s.hits.saturating_add(1);
            s.read_bytes = s.read_bytes.saturating_add(bytes as u64);
        } else {
            s.misses = s.misses.saturating_add(1);
        }
    }

    // == Record Write ==
    /// Records a completed write of `bytes` encoded bytes.
    pub fn record_write(&self, bytes: usize) {
        let mut s = self.inner.lock();
        s.write_count = s.write_count.saturating_add(1);
        s.write_bytes = s.write_bytes.saturating_add(bytes as u64);
    }

    /// Records a completed delete.
    pub fn record_delete(&self) {
        let mut s = self.inner.lock();
        s.delete_count = s.delete_count.saturating_add(1);
    }

    /// Records a completed clear.
    pub fn record_clear(&self) {
        let mut s = self.inner.lock();
        s.clear_count = s.clear_count.saturating_add(1);
    }

    // == Record Errors ==
    /// Records a failed read.
    pub fn record_read_error(&self) {
        let mut s = self.inner.lock();
        s.err_read_count = s.err_read_count.saturating_add(1);
    }

    /// Records a failed write.
    pub fn record_write_error(&self) {
        let mut s = self.inner.lock();
        s.err_write_count = s.err_write_count.saturating_add(1);
    }

    /// Records a failed delete.
    pub fn record_delete_error(&self) {
        let mut s = self.inner.lock();
        s.err_delete_count = s.err_delete_count.saturating_add(1);
    }

    /// Records a failed clear.
    pub fn record_clear_error(&self) {
        let mut s = self.inner.lock();
        s.err_clear_count = s.err_clear_count.saturating_add(1);
    }
}
