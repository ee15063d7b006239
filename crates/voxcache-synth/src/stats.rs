//! Cache outcome counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by a [`CachingSynthesizer`](crate::CachingSynthesizer).
///
/// Shared with the detached write tasks, so writes that land after the
/// response is returned are still counted.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    write_failures: AtomicU64,
    skipped_partial_writes: AtomicU64,
    degraded_lookups: AtomicU64,
}

impl CacheStats {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_partial_write(&self) {
        self.skipped_partial_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// A store lookup failed and was treated as a miss.
    pub fn record_degraded_lookup(&self) {
        self.degraded_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            skipped_partial_writes: self.skipped_partial_writes.load(Ordering::Relaxed),
            degraded_lookups: self.degraded_lookups.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Entries successfully written to the store.
    pub writes: u64,
    /// Store writes that failed and were dropped.
    pub write_failures: u64,
    /// Abandoned streams not written because partial writes are disabled.
    pub skipped_partial_writes: u64,
    /// Lookups whose store error was treated as a miss.
    pub degraded_lookups: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of lookups served from the cache, `0.0` with no lookups.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = CacheStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_write_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.hits, 3);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.writes, 0);
        assert_eq!(snap.write_failures, 1);
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_rate_without_lookups() {
        assert!(CacheStatsSnapshot::default().hit_rate().abs() < f64::EPSILON);
    }
}
