//! Seeded randomness for spawning and shuffling
//!
//! Every session owns one `GameRng`. Same seed, same food cells, same mole
//! holes, same deck order.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: Pcg32,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the thread RNG (binary / browser use only, never in tests)
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed for the next session, derived so restarts don't replay the same run
    pub fn next_seed(&mut self) -> u64 {
        self.inner.random()
    }

    /// Uniform integer in `[0, upper)`; `upper` must be non-zero
    #[inline]
    pub fn below(&mut self, upper: usize) -> usize {
        self.inner.random_range(0..upper)
    }

    /// Uniform integer in `[low, high)`
    #[inline]
    pub fn between(&mut self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.inner.random_range(low..high)
    }

    /// Fair coin mapped to a sign
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.inner.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    /// Fisher-Yates in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
