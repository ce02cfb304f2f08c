//! Address reduction for the feedback step
//!
//! Half of all selectors land in the first table page. The other half is
//! spread over tiers whose address space doubles while the selector range
//! each tier claims grows by 1/16 per step:
//!
//! ```text
//! selector in [MAX/2, MAX]          -> value mod 2^20
//! selector <  MAX/32 + part_0       -> value mod 2^16
//! selector <  previous + part_1     -> value mod 2^17
//! ...
//! ```

use crate::params::{PAGE_ENTRIES, REDUCTION_PART_GROWTH, REDUCTION_SPACE_START};

/// Selectors at or above this value take the single-page fast path
const FAST_PATH_THRESHOLD: u64 = u64::MAX / 2;

/// Number of tiers produced before the limit would overflow
pub const TIER_COUNT: usize = count_tiers();

/// `(limit, space)` pairs: the first tier whose limit exceeds the selector
/// decides the address space
pub const TIERS: [(u64, u64); TIER_COUNT] = build_tiers();

const fn count_tiers() -> usize {
    let mut limit = u64::MAX / 32;
    let mut part = limit / 2;
    let mut count = 0;
    while limit < u64::MAX - part {
        limit += part;
        part += part / REDUCTION_PART_GROWTH;
        count += 1;
    }
    count
}

const fn build_tiers() -> [(u64, u64); TIER_COUNT] {
    let mut tiers = [(0u64, 0u64); TIER_COUNT];
    let mut limit = u64::MAX / 32;
    let mut part = limit / 2;
    let mut space = REDUCTION_SPACE_START;
    let mut i = 0;
    while i < TIER_COUNT {
        limit += part;
        tiers[i] = (limit, space);
        part += part / REDUCTION_PART_GROWTH;
        space *= 2;
        i += 1;
    }
    tiers
}

/// Map `value` to a table address whose range is chosen by `selector`
///
/// Total over the whole 64-bit domain. If no tier claims the selector the
/// value is returned unreduced and resolves through the fallback hash.
#[inline(always)]
pub fn reduce(selector: u64, value: u64) -> u64 {
    if selector >= FAST_PATH_THRESHOLD {
        return value % PAGE_ENTRIES as u64;
    }

    for &(limit, space) in TIERS.iter() {
        if selector < limit {
            return value % space;
        }
    }

    value
}
