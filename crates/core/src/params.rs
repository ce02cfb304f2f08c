//! mSHA3 Algorithm Parameters
//!
//! Sponge geometry is fixed for a 512-bit digest. Page geometry matches the
//! on-disk page files, so changing it invalidates every persisted table.

/// Lanes in the Keccak-f[1600] state
pub const STATE_LANES: usize = 25;

/// Serialized state size in bytes
pub const STATE_BYTES: usize = STATE_LANES * 8;

/// Capacity in lanes (twice the digest size)
pub const CAPACITY_LANES: usize = 16;

/// Rate in lanes (576 bits)
pub const RATE_LANES: usize = STATE_LANES - CAPACITY_LANES;

/// Digest size in bytes
pub const DIGEST_SIZE: usize = 64;

/// Keccak-f rounds per permutation
pub const KECCAK_ROUNDS: usize = 24;

/// SHA-3 domain separation bits `01` followed by the first padding bit
pub const DOMAIN_SUFFIX: u64 = 0x06;

/// Final padding bit, set in the top byte of the last rate lane
pub const PAD_TERMINATOR: u64 = 0x8000_0000_0000_0000;

/// Entries per table page (2^20)
pub const PAGE_ENTRIES: usize = 1 << 20;

/// Bytes per persisted page (8 MiB)
pub const PAGE_BYTES: usize = PAGE_ENTRIES * 8;

/// Fallback hash input: the index repeated to fill this many bytes
pub const FALLBACK_BUFFER_SIZE: usize = 256;

/// Address space of the first reduction tier
pub const REDUCTION_SPACE_START: u64 = 65_536;

/// Divisor for the per-tier growth of the selector range
pub const REDUCTION_PART_GROWTH: u64 = 16;

/// Default number of entries spot-checked when a page is loaded from disk
pub const DEFAULT_VERIFY_SAMPLES: usize = 16;
