//! Entrant order randomization.
//!
//! Generators never reach for a global RNG; they shuffle through a [`Shuffler`]
//! supplied by the caller.

use rand::SeedableRng;
use rand::rngs::{StdRng, ThreadRng};
use rand::seq::SliceRandom;

/// Source of entrant orderings
pub trait Shuffler {
    /// Permute `items` in place
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Production shuffler backed by the thread-local RNG
pub struct RandomShuffler {
    rng: ThreadRng,
}

impl RandomShuffler {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomShuffler {
    fn default() -> Self {
        Self::new()
    }
}

impl Shuffler for RandomShuffler {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Reproducible shuffler; the same seed yields the same orderings
pub struct SeededShuffler {
    rng: StdRng,
}

impl SeededShuffler {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Keeps the given order
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl Shuffler for NoShuffle {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}
