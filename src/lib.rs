//! mSHA3 Tool Library
//!
//! Operational side of the memory-hardened hash: parsing payloads,
//! running the self-test harness, benchmarking and reporting.
//!
//! # Overview
//!
//! The algorithm itself lives in `msha3-core` and is re-exported here as
//! [`algorithm`]. Node and wallet code only ever need three calls: build the
//! table once, then ask for plain or extended digests.
//!
//! # Example
//!
//! ```rust
//! use msha3::algorithm::{Msha3, plain_digest};
//!
//! let hasher = Msha3::new();
//! let extended = hasher.extended(b"block header");
//! assert_ne!(extended, plain_digest(b"block header"));
//! assert_eq!(hasher.stats().calls, 24);
//! ```

// Re-export the core algorithm
pub use msha3_core as algorithm;

pub mod bench;
pub mod input;
pub mod report;
pub mod selftest;

// Convenience re-exports
pub use algorithm::{extended_digest, plain_digest, Msha3, TableConfig, Variant};
