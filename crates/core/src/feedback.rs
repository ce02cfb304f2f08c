//! Feedback value resolution
//!
//! Every index resolves to `fallback_hash(index)`. The precomputed table is
//! only a cache of that function for the low indices, so a resolver without
//! a table is slower but gives identical results.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::context::{Digest, HashContext};
use crate::params::FALLBACK_BUFFER_SIZE;
use crate::table::PrecomputedTable;

/// Sink for resolver hit / miss events
pub trait FeedbackMetrics: Sync {
    fn record_hit(&self) {}
    fn record_miss(&self) {}
}

/// Discards all events
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMetrics;

impl FeedbackMetrics for NoMetrics {}

/// Process-wide diagnostic counters
///
/// Relaxed atomics: each counter is exact, but a [`FeedbackCounters::snapshot`]
/// taken while other threads hash may mix counts from slightly different
/// moments.
#[derive(Debug, Default)]
pub struct FeedbackCounters {
    calls: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FeedbackCounters {
    pub const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> FeedbackStats {
        FeedbackStats {
            calls: self.calls.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.calls.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl FeedbackMetrics for FeedbackCounters {
    #[inline]
    fn record_hit(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn record_miss(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`FeedbackCounters`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeedbackStats {
    pub calls: u64,
    pub hits: u64,
    pub misses: u64,
}

impl FeedbackStats {
    /// Share of resolutions served by the table, in percent
    pub fn hit_ratio(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.hits as f64 / self.calls as f64 * 100.0
    }

    /// Counts accumulated since `earlier`
    pub fn since(&self, earlier: &FeedbackStats) -> FeedbackStats {
        FeedbackStats {
            calls: self.calls.wrapping_sub(earlier.calls),
            hits: self.hits.wrapping_sub(earlier.hits),
            misses: self.misses.wrapping_sub(earlier.misses),
        }
    }
}

/// Resolves reduced addresses to nonzero feedback words
#[derive(Clone, Copy)]
pub struct FeedbackResolver<'a> {
    table: Option<&'a PrecomputedTable>,
    metrics: &'a dyn FeedbackMetrics,
}

impl<'a> FeedbackResolver<'a> {
    pub fn new(table: &'a PrecomputedTable, metrics: &'a dyn FeedbackMetrics) -> Self {
        Self {
            table: Some(table),
            metrics,
        }
    }

    /// Resolver that computes every value directly
    pub fn without_table(metrics: &'a dyn FeedbackMetrics) -> Self {
        Self {
            table: None,
            metrics,
        }
    }

    /// Number of indices served from the table
    pub fn covered(&self) -> u64 {
        self.table.map_or(0, PrecomputedTable::covered)
    }

    /// Feedback word for `index`, never zero
    #[inline]
    pub fn resolve(&self, index: u64) -> u64 {
        if let Some(value) = self.table.and_then(|table| table.get(index)) {
            self.metrics.record_hit();
            return value;
        }

        self.metrics.record_miss();
        fallback_hash(index)
    }
}

/// Plain SHA3-512 of `index` repeated over 256 bytes, XOR-folded to 64 bits
///
/// Runs on [`HashContext<Plain>`](crate::Plain) only. Zero folds to 1.
pub fn fallback_hash(index: u64) -> u64 {
    let word = index.to_le_bytes();
    let mut buffer = [0u8; FALLBACK_BUFFER_SIZE];
    for chunk in buffer.chunks_exact_mut(8) {
        chunk.copy_from_slice(&word);
    }

    let mut ctx = HashContext::plain();
    ctx.update(&buffer);
    fold_digest(&ctx.finalize())
}

/// XOR of the eight little-endian words of `digest`; zero folds to 1
fn fold_digest(digest: &Digest) -> u64 {
    let folded = digest.chunks_exact(8).fold(0u64, |acc, chunk| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        acc ^ u64::from_le_bytes(bytes)
    });

    if folded == 0 { 1 } else { folded }
}
