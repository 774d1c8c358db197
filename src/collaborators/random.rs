//! Seeded random source used to place the initial boid population.
//!
//! Built on `rand::rngs::StdRng` + `Rng::random_range`, narrowed to the
//! single operation the engine actually needs: `rand_double(lo, hi) -> f64`.
//! A C `std::srand(0)`-style process seeds once for reproducible runs;
//! `SeededRandom` plays the same role here with an explicit seed instead of
//! a process-wide PRNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform doubles. Boxed as `dyn RandomSource` so the
/// simulator can be constructed with either a reproducible seeded source or
/// (in principle) an OS-entropy source without changing its signature.
pub trait RandomSource {
    /// A uniform value in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

/// The default `RandomSource`: a seeded `StdRng`, matching `srand(0)`'s
/// "consistent seed" role in the original's `main`.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_bounds() {
        let mut rng = SeededRandom::new(0);
        for _ in 0..100 {
            let v = rng.uniform(-5.0, 5.0);
            assert!((-5.0..5.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_reproduces_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..10 {
            assert_eq!(a.uniform(0.0, 1000.0), b.uniform(0.0, 1000.0));
        }
    }

    #[test]
    fn degenerate_range_returns_lo() {
        let mut rng = SeededRandom::new(0);
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
    }
}
