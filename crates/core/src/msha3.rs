//! Public mSHA3 entry points
//!
//! [`Msha3`] is the composition root: it owns the precomputed table and the
//! diagnostic counters, and lends both to every extended computation. It is
//! `Sync`, so one instance serves any number of threads.

use crate::context::{Digest, HashContext};
use crate::feedback::{FeedbackCounters, FeedbackResolver, FeedbackStats, NoMetrics};
use crate::keccak::{Extended, Plain};
use crate::table::PrecomputedTable;

#[cfg(feature = "std")]
use crate::{error::TableError, store::TableConfig};

/// Which permutation a digest runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Standard SHA3-512
    #[default]
    Plain,
    /// Memory-hardened variant with per-round table feedback
    Extended,
}

/// mSHA3 hasher owning the feedback table
#[derive(Debug, Default)]
pub struct Msha3 {
    table: PrecomputedTable,
    counters: FeedbackCounters,
}

impl Msha3 {
    /// Hasher without a table: extended digests are correct but every
    /// feedback value is computed on the spot
    pub fn new() -> Self {
        Self::with_table(PrecomputedTable::empty())
    }

    pub fn with_table(table: PrecomputedTable) -> Self {
        Self {
            table,
            counters: FeedbackCounters::new(),
        }
    }

    /// Load or build the table described by `config`
    #[cfg(feature = "std")]
    pub fn initialize(config: &TableConfig) -> Result<Self, TableError> {
        PrecomputedTable::load_or_build(config).map(Self::with_table)
    }

    pub fn table(&self) -> &PrecomputedTable {
        &self.table
    }

    /// Resolver backed by this hasher's table and counters
    pub fn resolver(&self) -> FeedbackResolver<'_> {
        FeedbackResolver::new(&self.table, &self.counters)
    }

    /// Standard SHA3-512 of `input`
    pub fn plain(&self, input: &[u8]) -> Digest {
        plain_digest(input)
    }

    /// Memory-hardened digest of `input`
    pub fn extended(&self, input: &[u8]) -> Digest {
        let resolver = self.resolver();
        let mut ctx = HashContext::new(Extended::new(&resolver));
        ctx.update(input);
        ctx.finalize()
    }

    pub fn digest(&self, variant: Variant, input: &[u8]) -> Digest {
        match variant {
            Variant::Plain => self.plain(input),
            Variant::Extended => self.extended(input),
        }
    }

    /// Counter snapshot since construction or the last [`Msha3::reset_stats`]
    pub fn stats(&self) -> FeedbackStats {
        self.counters.snapshot()
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }
}

/// Standard SHA3-512
pub fn plain_digest(input: &[u8]) -> Digest {
    let mut ctx = HashContext::<Plain>::plain();
    ctx.update(input);
    ctx.finalize()
}

/// Memory-hardened digest without a table
///
/// Same output as [`Msha3::extended`], only slower. For repeated hashing
/// create an [`Msha3`] with a table instead.
pub fn extended_digest(input: &[u8]) -> Digest {
    let resolver = FeedbackResolver::without_table(&NoMetrics);
    let mut ctx = HashContext::new(Extended::new(&resolver));
    ctx.update(input);
    ctx.finalize()
}

/// Check if a digest has at least `difficulty` leading zero bits
#[inline(always)]
pub fn meets_difficulty(digest: &Digest, difficulty: u32) -> bool {
    let mut zero_bits = 0u32;

    for byte in digest.iter() {
        if *byte == 0 {
            zero_bits += 8;
        } else {
            zero_bits += byte.leading_zeros();
            break;
        }
    }

    zero_bits >= difficulty
}
