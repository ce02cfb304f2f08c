//! Keccak-f[1600] with the optional feedback step
//!
//! The permutation itself is the unmodified FIPS 202 one. Extended mode adds
//! a single extra step after Iota in every round:
//!
//! ```text
//! lane[0] ^= resolve(reduce(lane[1], lane[0]))
//! ```
//!
//! The mode is a type, not a flag. The fallback hash inside the resolver is
//! written against [`Plain`], so feedback can never recurse into itself.

use crate::feedback::FeedbackResolver;
use crate::params::{KECCAK_ROUNDS, STATE_BYTES, STATE_LANES};
use crate::reduction::reduce;

/// Iota round constants
const ROUND_CONSTANTS: [u64; KECCAK_ROUNDS] = [
    0x0000_0000_0000_0001,
    0x0000_0000_0000_8082,
    0x8000_0000_0000_808a,
    0x8000_0000_8000_8000,
    0x0000_0000_0000_808b,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8009,
    0x0000_0000_0000_008a,
    0x0000_0000_0000_0088,
    0x0000_0000_8000_8009,
    0x0000_0000_8000_000a,
    0x0000_0000_8000_808b,
    0x8000_0000_0000_008b,
    0x8000_0000_0000_8089,
    0x8000_0000_0000_8003,
    0x8000_0000_0000_8002,
    0x8000_0000_0000_0080,
    0x0000_0000_0000_800a,
    0x8000_0000_8000_000a,
    0x8000_0000_8000_8081,
    0x8000_0000_0000_8080,
    0x0000_0000_8000_0001,
    0x8000_0000_8000_8008,
];

/// Rho rotation offsets, in Pi traversal order
const RHO_OFFSETS: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

/// Pi lane traversal order
const PI_LANES: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// The 1600-bit sponge state as 25 little-endian lanes
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct State {
    lanes: [u64; STATE_LANES],
}

impl State {
    /// All-zero state
    pub const fn new() -> Self {
        Self {
            lanes: [0u64; STATE_LANES],
        }
    }

    #[inline(always)]
    pub fn lane(&self, index: usize) -> u64 {
        self.lanes[index]
    }

    /// XOR a word into one lane
    #[inline(always)]
    pub fn xor_lane(&mut self, index: usize, word: u64) {
        self.lanes[index] ^= word;
    }

    /// Serialize all lanes little-endian
    pub fn to_bytes(&self) -> [u8; STATE_BYTES] {
        let mut out = [0u8; STATE_BYTES];
        for (chunk, lane) in out.chunks_exact_mut(8).zip(self.lanes.iter()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    /// Inverse of [`State::to_bytes`]
    pub fn from_bytes(bytes: &[u8; STATE_BYTES]) -> Self {
        let mut lanes = [0u64; STATE_LANES];
        for (lane, chunk) in lanes.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *lane = u64::from_le_bytes(word);
        }
        Self { lanes }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("State").finish_non_exhaustive()
    }
}

/// How a sponge permutes its state
pub trait Permutation {
    /// Run all 24 rounds over `state`
    fn permute(&self, state: &mut State);
}

/// Standard Keccak-f[1600], identical to SHA3
#[derive(Clone, Copy, Debug, Default)]
pub struct Plain;

impl Permutation for Plain {
    #[inline]
    fn permute(&self, state: &mut State) {
        keccak_f(&mut state.lanes, |_, _| 0);
    }
}

/// Keccak-f[1600] with the memory feedback step after every round
#[derive(Clone, Copy)]
pub struct Extended<'r> {
    resolver: &'r FeedbackResolver<'r>,
}

impl<'r> Extended<'r> {
    pub fn new(resolver: &'r FeedbackResolver<'r>) -> Self {
        Self { resolver }
    }
}

impl Permutation for Extended<'_> {
    #[inline]
    fn permute(&self, state: &mut State) {
        let resolver = self.resolver;
        keccak_f(&mut state.lanes, |lane0, lane1| {
            resolver.resolve(reduce(lane1, lane0))
        });
    }
}

impl core::fmt::Debug for Extended<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Extended")
            .field("covered", &self.resolver.covered())
            .finish()
    }
}

/// Keccak-f[1600] over raw lanes
///
/// `feedback(lane0, lane1)` is XORed into lane 0 after Iota in every round.
/// Plain mode passes a closure returning 0, which the optimizer removes.
#[inline(always)]
pub fn keccak_f<F>(s: &mut [u64; STATE_LANES], feedback: F)
where
    F: Fn(u64, u64) -> u64,
{
    let mut bc = [0u64; 5];

    for &round_constant in ROUND_CONSTANTS.iter() {
        // Theta
        for (x, column) in bc.iter_mut().enumerate() {
            *column = s[x] ^ s[x + 5] ^ s[x + 10] ^ s[x + 15] ^ s[x + 20];
        }
        for x in 0..5 {
            let t = bc[(x + 4) % 5] ^ bc[(x + 1) % 5].rotate_left(1);
            for y in (0..STATE_LANES).step_by(5) {
                s[y + x] ^= t;
            }
        }

        // Rho and Pi
        let mut current = s[1];
        for (&lane, &offset) in PI_LANES.iter().zip(RHO_OFFSETS.iter()) {
            let next = s[lane];
            s[lane] = current.rotate_left(offset);
            current = next;
        }

        // Chi
        for y in (0..STATE_LANES).step_by(5) {
            bc.copy_from_slice(&s[y..y + 5]);
            for x in 0..5 {
                s[y + x] ^= !bc[(x + 1) % 5] & bc[(x + 2) % 5];
            }
        }

        // Iota
        s[0] ^= round_constant;

        // Feedback
        s[0] ^= feedback(s[0], s[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_state_permutation() {
        // Keccak-f[1600] applied once to the all-zero state (KeccakCodePackage)
        let mut state = State::new();
        Plain.permute(&mut state);
        assert_eq!(state.lane(0), 0xf125_8f79_40e1_dde7);
        assert_eq!(state.lane(1), 0x84d5_ccf9_33c0_478a);
        assert_eq!(state.lane(24), 0xeaf1_ff7b_5cec_a249);
    }

    #[test]
    fn test_state_byte_roundtrip_is_little_endian() {
        let mut state = State::new();
        state.xor_lane(0, 0x0807_0605_0403_0201);
        state.xor_lane(24, 0xff00_0000_0000_0000);
        let bytes = state.to_bytes();
        assert_eq!(&bytes[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(bytes[STATE_BYTES - 1], 0xff);
        assert_eq!(State::from_bytes(&bytes), state);
    }

    #[test]
    fn test_feedback_changes_output() {
        let mut plain = State::new();
        let mut tweaked = State::new();
        keccak_f(&mut plain.lanes, |_, _| 0);
        keccak_f(&mut tweaked.lanes, |_, _| 1);
        assert_ne!(plain, tweaked);
    }
}
