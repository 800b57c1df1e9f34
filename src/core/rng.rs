//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ algorithm for fast, deterministic randomness.
//! The rabbit hazard is the only consumer; given the same seed a match
//! replays identically on every platform.

use serde::{Serialize, Deserialize};
use super::hash::hash_with_domain;

/// A source of uniform integers.
///
/// Hazard movement only needs "pick one of n", so this is the seam tests
/// use to script outcomes.
pub trait RandomSource {
    /// Uniform integer in `[0, max)`. Returns 0 when `max` is 0.
    fn next_int(&mut self, max: u32) -> u32;
}

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Example
///
/// ```
/// use root_wars::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // State must never be all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Select a random element from a slice.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = RandomSource::next_int(self, slice.len() as u32) as usize;
            slice.get(idx)
        }
    }

    /// Get current state (for state hashing).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }
}

impl RandomSource for DeterministicRng {
    #[inline]
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple modulo - slight bias for very large max, irrelevant for six neighbours
        (self.next_u64() % max as u64) as u32
    }
}

/// SplitMix64 for seed initialization.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a 64-bit seed from an arbitrary label (room name, match id).
///
/// Every participant that knows the label derives the same seed, so the
/// relay only has to agree on the label.
pub fn seed_from_label(label: &str) -> u64 {
    let hash = hash_with_domain(b"ROOT_WARS_SEED_V1", label.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[0..8]);
    u64::from_le_bytes(bytes)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_int() {
        let mut rng = DeterministicRng::new(1234);

        for _ in 0..1000 {
            assert!(rng.next_int(6) < 6);
        }

        // Edge cases
        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_next_int_covers_range() {
        let mut rng = DeterministicRng::new(77);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[rng.next_int(6) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_choose() {
        let mut rng = DeterministicRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());

        let items = [10, 20, 30];
        for _ in 0..100 {
            let picked = rng.choose(&items).copied();
            assert!(matches!(picked, Some(10 | 20 | 30)));
        }
    }

    #[test]
    fn test_seed_from_label() {
        assert_eq!(seed_from_label("room-1"), seed_from_label("room-1"));
        assert_ne!(seed_from_label("room-1"), seed_from_label("room-2"));
    }

    #[test]
    fn test_state_tracks_draws() {
        let mut rng = DeterministicRng::new(5555);
        let fresh = DeterministicRng::new(5555).state();
        assert_eq!(rng.state(), fresh);

        rng.next_u64();
        assert_ne!(rng.state(), fresh);

        let mut copy = rng.clone();
        assert_eq!(copy.next_u64(), rng.next_u64());
        assert_eq!(copy.state(), rng.state());
    }
}
