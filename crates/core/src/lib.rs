//! # mSHA3 Core Algorithm
//!
//! SHA3-512 plus a memory-hardened variant for block validation and
//! proof-of-work hashing on memory-constrained hardware.
//!
//! ## Features
//!
//! - **Standard**: plain mode is bit-for-bit SHA3-512
//! - **Memory-Hard**: extended mode mixes a table value into lane 0 after
//!   every one of the 24 Keccak rounds
//! - **Paged Table**: 8 MiB pages of precomputed feedback values, persisted
//!   as raw little-endian files and loaded once per process
//! - **Total**: any index outside the table is computed directly, so the
//!   table only changes speed, never output
//!
//! ## Extended Mode
//!
//! ```text
//! for round in 0..24:
//!     theta; rho; pi; chi; iota
//!     lane[0] ^= resolve(reduce(lane[1], lane[0]))
//!
//! resolve(i) = table[i]            if i < pages * 2^20
//!            = fallback_hash(i)    otherwise
//! ```
//!
//! `fallback_hash(i)` is the XOR-fold of SHA3-512 over `i` (little-endian)
//! repeated to 256 bytes, with 0 mapped to 1.
//!
//! ## Example
//!
//! ```rust
//! use msha3_core::{Msha3, PrecomputedTable, extended_digest, plain_digest};
//!
//! // Standard SHA3-512
//! let digest = plain_digest(b"abc");
//! assert_eq!(digest[0], 0xb7);
//!
//! // Memory-hardened digest, no table: correct but slow
//! let slow = extended_digest(b"block header");
//!
//! // Shared hasher; with a loaded table the same call gets fast
//! let hasher = Msha3::with_table(PrecomputedTable::empty());
//! assert_eq!(hasher.extended(b"block header"), slow);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use msha3_core::{HashContext, plain_digest};
//!
//! let mut ctx = HashContext::plain();
//! ctx.update(b"a");
//! ctx.update(b"bc");
//! assert_eq!(ctx.finalize(), plain_digest(b"abc"));
//! ```
//!
//! ## no_std Support
//!
//! Without the default `std` feature the crate needs only `alloc`. Page
//! files, [`TableError`] and the C FFI are then unavailable.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod context;
mod feedback;
mod keccak;
mod msha3;
mod params;
mod reduction;
mod table;

#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
mod ffi;
#[cfg(feature = "std")]
mod store;

pub use context::{Digest, HashContext};
pub use feedback::{
    FeedbackCounters, FeedbackMetrics, FeedbackResolver, FeedbackStats, NoMetrics, fallback_hash,
};
pub use keccak::{Extended, Permutation, Plain, State, keccak_f};
pub use msha3::{Msha3, Variant, extended_digest, meets_difficulty, plain_digest};
pub use params::*;
pub use reduction::{TIER_COUNT, TIERS, reduce};
pub use table::{Page, PrecomputedTable, compute_page, verify_page};

#[cfg(feature = "std")]
pub use error::TableError;
#[cfg(feature = "std")]
pub use store::{DEFAULT_TABLE_DIR, TableConfig, read_page, write_page};

#[cfg(test)]
mod tests;
