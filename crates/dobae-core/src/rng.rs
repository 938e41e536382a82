//! Deterministic random number generator
//!
//! Uses a simple xorshift64 algorithm for reproducibility across platforms:
//! the same seed produces the same map tiles and gacha sequence everywhere.
//! Not cryptographic, and not meant to be.

use serde::{Deserialize, Serialize};

/// A deterministic random number generator.
///
/// The state is part of the game model so a saved game resumes its random
/// sequence instead of restarting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create an RNG from a saved state.
    pub fn from_state(state: u64) -> Self {
        let state = if state == 0 { 1 } else { state };
        Self { state }
    }

    /// Get the current state (for saving).
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64 + 1.0)
    }

    /// Generate a random i64 in range [min, max].
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        let range = (max - min + 1) as u64;
        let value = self.next_u64() % range;
        min + value as i64
    }

    /// Pick a random index for a weighted list.
    /// Returns None if weights is empty or all weights are zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || weights.is_empty() {
            return None;
        }

        let mut threshold = self.next_f64() * total;
        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Float drift can exhaust the list without a hit; the last entry
        // is the correct answer then, never an error.
        Some(weights.len() - 1)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Hash a place name into a 32-bit map seed (FNV-1a over UTF-8 bytes).
///
/// The raw hash value matters beyond seeding: the map generator uses
/// `seed % 3` as a house-count perturbation.
pub fn seed_from_name(name: &str) -> u32 {
    let mut hash: u32 = 2_166_136_261;
    for byte in name.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_range() {
        let mut rng = GameRng::new(42);

        for _ in 0..100 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
        }

        for _ in 0..100 {
            let i = rng.range_i64(10, 20);
            assert!((10..=20).contains(&i));
        }
    }

    #[test]
    fn test_weighted_index() {
        let mut rng = GameRng::new(42);
        let weights = [1.0, 2.0, 3.0];

        let mut counts = [0; 3];
        for _ in 0..6000 {
            if let Some(i) = rng.weighted_index(&weights) {
                counts[i] += 1;
            }
        }

        // Rough check that weighting works (index 2 should have ~3x index 0)
        assert!(counts[2] > counts[0] * 2);
    }

    #[test]
    fn test_weighted_index_rejects_zero_total() {
        let mut rng = GameRng::new(42);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_seed_from_name_is_stable() {
        assert_eq!(seed_from_name("서울"), seed_from_name("서울"));
        assert_ne!(seed_from_name("마포구"), seed_from_name("송파구"));
        // FNV-1a offset basis for the empty string
        assert_eq!(seed_from_name(""), 2_166_136_261);
    }
}
