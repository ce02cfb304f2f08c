//! Streaming absorb / finalize over the 576-bit rate
//!
//! Input is folded into lanes one little-endian word at a time. Bytes that
//! do not yet complete a word wait in `pending`, so the split of the input
//! across [`HashContext::update`] calls never affects the result.

use crate::keccak::{Permutation, Plain, State};
use crate::params::{DIGEST_SIZE, DOMAIN_SUFFIX, PAD_TERMINATOR, RATE_LANES};

/// A 512-bit digest
pub type Digest = [u8; DIGEST_SIZE];

/// Incremental hasher parameterized by its permutation mode
///
/// [`HashContext::finalize`] takes `self`, so a finalized context cannot
/// absorb more input.
#[derive(Clone, Debug)]
pub struct HashContext<P: Permutation> {
    state: State,
    /// Bytes of the word being assembled, little-endian
    pending: u64,
    /// Number of bytes in `pending` (0..8)
    pending_len: usize,
    /// Next rate lane to absorb into (0..RATE_LANES)
    lane: usize,
    permutation: P,
}

impl HashContext<Plain> {
    /// Standard SHA3-512 context
    pub fn plain() -> Self {
        Self::new(Plain)
    }
}

impl Default for HashContext<Plain> {
    fn default() -> Self {
        Self::plain()
    }
}

impl<P: Permutation> HashContext<P> {
    /// Zeroed context permuting with `permutation`
    pub fn new(permutation: P) -> Self {
        Self {
            state: State::new(),
            pending: 0,
            pending_len: 0,
            lane: 0,
            permutation,
        }
    }

    /// Absorb `input`
    pub fn update(&mut self, mut input: &[u8]) {
        // Complete a partially assembled word first
        if self.pending_len > 0 {
            let take = (8 - self.pending_len).min(input.len());
            let (head, rest) = input.split_at(take);
            for &byte in head {
                self.pending |= (byte as u64) << (self.pending_len * 8);
                self.pending_len += 1;
            }
            input = rest;

            if self.pending_len < 8 {
                return;
            }
            let word = self.pending;
            self.pending = 0;
            self.pending_len = 0;
            self.absorb_word(word);
        }

        let mut words = input.chunks_exact(8);
        for chunk in &mut words {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            self.absorb_word(u64::from_le_bytes(bytes));
        }

        for &byte in words.remainder() {
            self.pending |= (byte as u64) << (self.pending_len * 8);
            self.pending_len += 1;
        }
    }

    /// Pad, run the last permutation and return the first 64 state bytes
    pub fn finalize(mut self) -> Digest {
        let suffix = DOMAIN_SUFFIX << (self.pending_len * 8);
        self.state.xor_lane(self.lane, self.pending ^ suffix);
        self.state.xor_lane(RATE_LANES - 1, PAD_TERMINATOR);
        self.permutation.permute(&mut self.state);

        let bytes = self.state.to_bytes();
        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes[..DIGEST_SIZE]);
        digest
    }

    /// Bytes buffered but not yet folded into a lane
    pub fn pending_len(&self) -> usize {
        self.pending_len
    }

    /// Index of the next rate lane to absorb into
    pub fn lane_cursor(&self) -> usize {
        self.lane
    }

    #[inline(always)]
    fn absorb_word(&mut self, word: u64) {
        self.state.xor_lane(self.lane, word);
        self.lane += 1;
        if self.lane == RATE_LANES {
            self.permutation.permute(&mut self.state);
            self.lane = 0;
        }
    }
}
